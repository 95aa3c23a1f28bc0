// Conversion of widget specifications into dashboard body widgets
use crate::application::metric_encoder::encode_reference;
use crate::domain::dashboard::{
    Legend, MetricProperties, MetricRow, RenderedWidget, TextProperties, WidgetProperties, YAxis, YAxisSide,
};
use crate::domain::error::CompileError;
use crate::domain::layout::{GridPosition, place};
use crate::domain::metric::MetricReference;
use crate::domain::widget::{GraphWidget, TextWidget, WidgetSpec, YAxisSettings};

pub const TEXT_BODY_TYPE: &str = "text";
pub const METRIC_BODY_TYPE: &str = "metric";

/// Renders a widget into the dashboard body, placed after `previous`.
pub trait EncodeWidget {
    fn to_dashboard_widget(&self, previous: Option<GridPosition>) -> Result<RenderedWidget, CompileError>;
}

impl EncodeWidget for TextWidget {
    fn to_dashboard_widget(&self, previous: Option<GridPosition>) -> Result<RenderedWidget, CompileError> {
        let position = place(self.size(), previous);
        let widget = RenderedWidget {
            kind: TEXT_BODY_TYPE,
            x: position.x,
            y: position.y,
            width: self.width,
            height: self.height,
            properties: WidgetProperties::Text(TextProperties {
                markdown: self.markdown.clone(),
                background: self.background.clone().filter(|b| !b.is_empty()),
            }),
        };

        tracing::debug!("built text widget at ({}, {})", widget.x, widget.y);
        Ok(widget)
    }
}

impl EncodeWidget for GraphWidget {
    fn to_dashboard_widget(&self, previous: Option<GridPosition>) -> Result<RenderedWidget, CompileError> {
        let mut metrics = encode_side(&self.left, true)?;
        metrics.extend(encode_side(&self.right, false)?);
        let row_count = metrics.len();

        let left = self.left_y_axis.as_ref().map(y_axis_side);
        let right = self.right_y_axis.as_ref().map(y_axis_side);
        let y_axis = (left.is_some() || right.is_some()).then_some(YAxis { left, right });

        let position = place(self.size(), previous);
        let widget = RenderedWidget {
            kind: METRIC_BODY_TYPE,
            x: position.x,
            y: position.y,
            width: self.width,
            height: self.height,
            properties: WidgetProperties::Metric(MetricProperties {
                live_data: self.live_data,
                legend: non_empty(&self.legend_position).map(|position| Legend { position }),
                metrics,
                period: self.period.filter(|p| *p != 0),
                region: self.region.clone(),
                stat: non_empty(&self.statistic),
                title: non_empty(&self.title),
                view: non_empty(&self.view),
                stacked: self.stacked,
                sparkline: self.sparkline,
                timezone: non_empty(&self.timezone),
                y_axis,
            }),
        };

        tracing::debug!(
            "built graph widget at ({}, {}) with {} metric rows",
            widget.x,
            widget.y,
            row_count
        );
        Ok(widget)
    }
}

impl EncodeWidget for WidgetSpec {
    fn to_dashboard_widget(&self, previous: Option<GridPosition>) -> Result<RenderedWidget, CompileError> {
        match self {
            WidgetSpec::Text(widget) => widget.to_dashboard_widget(previous),
            WidgetSpec::Graph(widget) => widget.to_dashboard_widget(previous),
        }
    }
}

fn encode_side(references: &[MetricReference], left: bool) -> Result<Vec<MetricRow>, CompileError> {
    let mut rows = Vec::with_capacity(references.len());
    for reference in references {
        rows.extend(encode_reference(reference, left)?);
    }
    Ok(rows)
}

fn y_axis_side(settings: &YAxisSettings) -> YAxisSide {
    YAxisSide {
        label: non_empty(&settings.label),
        min: settings.min.filter(|v| *v != 0.0),
        max: settings.max.filter(|v| *v != 0.0),
        show_units: settings.show_units.unwrap_or(false),
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}
