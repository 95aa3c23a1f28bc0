// Widget specification domain models
use super::layout::WidgetSize;
use super::metric::MetricReference;
use serde::Deserialize;

pub const TEXT_WIDGET_TYPE: &str = "text";
pub const GRAPH_WIDGET_TYPE: &str = "graph";

/// One widget of a dashboard, as supplied by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetSpec {
    Text(TextWidget),
    Graph(GraphWidget),
}

impl WidgetSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            WidgetSpec::Text(_) => TEXT_WIDGET_TYPE,
            WidgetSpec::Graph(_) => GRAPH_WIDGET_TYPE,
        }
    }

    pub fn size(&self) -> WidgetSize {
        match self {
            WidgetSpec::Text(w) => w.size(),
            WidgetSpec::Graph(w) => w.size(),
        }
    }
}

impl From<TextWidget> for WidgetSpec {
    fn from(widget: TextWidget) -> Self {
        WidgetSpec::Text(widget)
    }
}

impl From<GraphWidget> for WidgetSpec {
    fn from(widget: GraphWidget) -> Self {
        WidgetSpec::Graph(widget)
    }
}

/// A markdown text block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextWidget {
    pub width: u32,
    pub height: u32,
    pub markdown: String,
    pub background: Option<String>,
}

impl TextWidget {
    pub fn new(width: u32, height: u32, markdown: impl Into<String>) -> Self {
        Self {
            width,
            height,
            markdown: markdown.into(),
            background: None,
        }
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn size(&self) -> WidgetSize {
        WidgetSize::new(self.width, self.height)
    }
}

/// A metric graph with metrics on the left and right Y axes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphWidget {
    pub width: u32,
    pub height: u32,
    pub left: Vec<MetricReference>,
    pub right: Vec<MetricReference>,
    pub left_y_axis: Option<YAxisSettings>,
    pub right_y_axis: Option<YAxisSettings>,
    pub legend_position: Option<String>,
    pub live_data: bool,
    pub period: Option<u32>,
    pub region: String,
    pub sparkline: bool,
    pub stacked: bool,
    pub statistic: Option<String>,
    pub timezone: Option<String>,
    pub title: Option<String>,
    pub view: Option<String>,
}

impl GraphWidget {
    pub fn new(width: u32, height: u32, region: impl Into<String>) -> Self {
        Self {
            width,
            height,
            region: region.into(),
            ..Self::default()
        }
    }

    pub fn size(&self) -> WidgetSize {
        WidgetSize::new(self.width, self.height)
    }
}

/// Settings for one Y axis of a graph.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct YAxisSettings {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub show_units: Option<bool>,
}
