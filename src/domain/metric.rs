// Metric reference domain models
use super::serde_helpers::{empty_as_none, zero_as_none};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const METRIC_TYPE: &str = "metric";
pub const METRIC_EXPRESSION_TYPE: &str = "metric_expression";

/// A metric shown on a graph: either a plain metric or a math expression over other metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MetricReference {
    #[serde(rename = "metric")]
    Plain(PlainMetric),
    #[serde(rename = "metric_expression")]
    Expression(MetricExpression),
}

impl MetricReference {
    pub fn kind(&self) -> &'static str {
        match self {
            MetricReference::Plain(_) => METRIC_TYPE,
            MetricReference::Expression(_) => METRIC_EXPRESSION_TYPE,
        }
    }
}

impl From<PlainMetric> for MetricReference {
    fn from(metric: PlainMetric) -> Self {
        MetricReference::Plain(metric)
    }
}

impl From<MetricExpression> for MetricReference {
    fn from(expression: MetricExpression) -> Self {
        MetricReference::Expression(expression)
    }
}

/// A CloudWatch metric identified by namespace, name and dimensions.
///
/// Serializes to the settings document the host stores for a metric, which is
/// also the format expected inside an expression's `using_metrics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainMetric {
    pub namespace: String,
    pub metric_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dimensions_map: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "zero_as_none", skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub statistic: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl PlainMetric {
    pub fn new(namespace: impl Into<String>, metric_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            metric_name: metric_name.into(),
            ..Self::default()
        }
    }

    pub fn with_dimension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions_map.insert(key.into(), value.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_period(mut self, period: u32) -> Self {
        self.period = Some(period);
        self
    }

    pub fn with_statistic(mut self, statistic: impl Into<String>) -> Self {
        self.statistic = Some(statistic.into());
        self
    }

    /// Serialize to the tagged settings document (`{"type":"metric",...}`).
    pub fn to_settings_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&MetricReference::Plain(self.clone()))
    }
}

/// A metric math expression together with the metrics it references.
///
/// `using_metrics` maps a variable name (as it appears in the expression) to the
/// settings document of a [`PlainMetric`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricExpression {
    pub expression: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "zero_as_none", skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(default)]
    pub using_metrics: HashMap<String, String>,
}

impl MetricExpression {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            ..Self::default()
        }
    }

    pub fn with_metric(mut self, variable: impl Into<String>, settings_json: impl Into<String>) -> Self {
        self.using_metrics.insert(variable.into(), settings_json.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_period(mut self, period: u32) -> Self {
        self.period = Some(period);
        self
    }

    /// Variable names in lexicographic order.
    pub fn sorted_variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.using_metrics.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
