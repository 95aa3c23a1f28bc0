// Dashboard domain models: the compile input and the rendered body
use super::layout::GridPosition;
use super::widget::WidgetSpec;
use serde::Serialize;
use serde_json::Value;

/// Maximum number of widgets CloudWatch accepts in one dashboard.
pub const MAX_WIDGETS: usize = 500;

pub const PERIOD_OVERRIDE_AUTO: &str = "auto";
pub const PERIOD_OVERRIDE_INHERIT: &str = "inherit";

/// Everything needed to compile one dashboard body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSpec {
    pub widgets: Vec<WidgetSpec>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub period_override: Option<String>,
}

impl DashboardSpec {
    pub fn new(widgets: Vec<WidgetSpec>) -> Self {
        Self {
            widgets,
            ..Self::default()
        }
    }
}

/// One row of a graph's `metrics` array: strings followed by a properties object.
pub type MetricRow = Vec<Value>;

// https://docs.aws.amazon.com/AmazonCloudWatch/latest/APIReference/CloudWatch-Dashboard-Body-Structure.html
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardBody {
    pub widgets: Vec<RenderedWidget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_override: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedWidget {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub properties: WidgetProperties,
}

impl RenderedWidget {
    pub fn position(&self) -> GridPosition {
        GridPosition::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WidgetProperties {
    Text(TextProperties),
    Metric(MetricProperties),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextProperties {
    pub markdown: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricProperties {
    #[serde(skip_serializing_if = "is_false")]
    pub live_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    pub metrics: Vec<MetricRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub stacked: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub sparkline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<YAxis>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YAxis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<YAxisSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<YAxisSide>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxisSide {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "is_false")]
    pub show_units: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}
