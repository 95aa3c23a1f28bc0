// Decoder for the host's tagged widget and metric settings documents
use crate::domain::error::CompileError;
use crate::domain::metric::{METRIC_EXPRESSION_TYPE, METRIC_TYPE, MetricReference};
use crate::domain::serde_helpers::{empty_as_none, zero_as_none};
use crate::domain::widget::{GRAPH_WIDGET_TYPE, GraphWidget, TEXT_WIDGET_TYPE, TextWidget, WidgetSpec, YAxisSettings};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct TextWidgetDocument {
    width: u32,
    height: u32,
    #[serde(default)]
    markdown: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    background: Option<String>,
}

// Left/Right hold metrics of several types, so they are decoded separately
#[derive(Debug, Deserialize)]
struct GraphWidgetDocument {
    width: u32,
    height: u32,
    #[serde(default)]
    left: Vec<Value>,
    #[serde(default)]
    right: Vec<Value>,
    #[serde(default)]
    left_y_axis: Option<YAxisSettings>,
    #[serde(default)]
    right_y_axis: Option<YAxisSettings>,
    #[serde(default, deserialize_with = "empty_as_none")]
    legend_position: Option<String>,
    #[serde(default)]
    live_data: bool,
    #[serde(default, deserialize_with = "zero_as_none")]
    period: Option<u32>,
    #[serde(default)]
    region: String,
    #[serde(default)]
    sparkline: bool,
    #[serde(default)]
    stacked: bool,
    #[serde(default, deserialize_with = "empty_as_none")]
    statistic: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    timezone: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    title: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    view: Option<String>,
}

/// Decode one widget settings document.
///
/// The document may arrive wrapped in an extra level of JSON string escaping,
/// which is removed first.
pub fn decode_widget(document: &str) -> Result<WidgetSpec, CompileError> {
    let value = parse_document(document, "widget")?;
    let kind = type_of(&value, "widget")?;

    match kind.as_str() {
        TEXT_WIDGET_TYPE => {
            let doc: TextWidgetDocument = from_value(value, "text widget")?;
            Ok(WidgetSpec::Text(TextWidget {
                width: doc.width,
                height: doc.height,
                markdown: doc.markdown,
                background: doc.background,
            }))
        }
        GRAPH_WIDGET_TYPE => {
            let doc: GraphWidgetDocument = from_value(value, "graph widget")?;
            Ok(WidgetSpec::Graph(GraphWidget {
                width: doc.width,
                height: doc.height,
                left: decode_metrics(doc.left)?,
                right: decode_metrics(doc.right)?,
                left_y_axis: doc.left_y_axis,
                right_y_axis: doc.right_y_axis,
                legend_position: doc.legend_position,
                live_data: doc.live_data,
                period: doc.period,
                region: doc.region,
                sparkline: doc.sparkline,
                stacked: doc.stacked,
                statistic: doc.statistic,
                timezone: doc.timezone,
                title: doc.title,
                view: doc.view,
            }))
        }
        _ => Err(CompileError::UnsupportedWidgetType(kind)),
    }
}

/// Decode a metric entry of a graph: an object or a string holding one.
pub fn decode_metric(value: Value) -> Result<MetricReference, CompileError> {
    let value = match value {
        Value::String(document) => parse_document(&document, "metric")?,
        other => other,
    };
    let kind = type_of(&value, "metric")?;

    match kind.as_str() {
        METRIC_TYPE | METRIC_EXPRESSION_TYPE => from_value(value, "metric"),
        _ => Err(CompileError::UnsupportedMetricType(kind)),
    }
}

fn decode_metrics(values: Vec<Value>) -> Result<Vec<MetricReference>, CompileError> {
    values.into_iter().map(decode_metric).collect()
}

// NOTE: the host escapes each document twice, so a string may wrap the real object
fn parse_document(document: &str, what: &'static str) -> Result<Value, CompileError> {
    let value: Value =
        serde_json::from_str(document).map_err(|source| CompileError::DefinitionDecode { what, source })?;
    match value {
        Value::String(inner) => {
            serde_json::from_str(&inner).map_err(|source| CompileError::DefinitionDecode { what, source })
        }
        other => Ok(other),
    }
}

fn type_of(value: &Value, what: &'static str) -> Result<String, CompileError> {
    value
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(CompileError::MissingType { what })
}

fn from_value<T: DeserializeOwned>(value: Value, what: &'static str) -> Result<T, CompileError> {
    serde_json::from_value(value).map_err(|source| CompileError::DefinitionDecode { what, source })
}
