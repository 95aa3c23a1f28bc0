// Grid layout for dashboard widgets

/// Width of the dashboard grid, in grid units.
pub const GRID_WIDTH: u32 = 24;

/// Tallest widget CloudWatch accepts, in grid units.
pub const MAX_WIDGET_HEIGHT: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetSize {
    pub width: u32,
    pub height: u32,
}

impl WidgetSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridPosition {
    pub x: u32,
    pub y: u32,
}

impl GridPosition {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Position of a widget of `size` placed after a widget at `previous`.
///
/// The first widget goes to the origin. Each following widget advances the
/// column by its own width and wraps to column 0 when the column reaches
/// [`GRID_WIDTH`], moving down by its own height. Only the immediate
/// predecessor is considered; cells occupied elsewhere are not tracked.
/// Coordinates saturate at `u32::MAX` instead of wrapping.
pub fn place(size: WidgetSize, previous: Option<GridPosition>) -> GridPosition {
    let Some(previous) = previous else {
        return GridPosition::default();
    };

    let x = previous.x.saturating_add(size.width);
    if x >= GRID_WIDTH {
        return GridPosition::new(0, previous.y.saturating_add(size.height));
    }

    GridPosition::new(x, previous.y)
}
