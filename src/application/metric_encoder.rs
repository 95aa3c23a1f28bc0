// Metric array encoding for graph widgets
// https://docs.aws.amazon.com/AmazonCloudWatch/latest/APIReference/CloudWatch-Dashboard-Body-Structure.html#CloudWatch-Dashboard-Properties-Metrics-Array-Format
use crate::domain::dashboard::MetricRow;
use crate::domain::error::CompileError;
use crate::domain::metric::{MetricExpression, MetricReference, PlainMetric};
use serde_json::{Map, Value};

pub const Y_AXIS_LEFT: &str = "left";
pub const Y_AXIS_RIGHT: &str = "right";

fn y_axis(left: bool) -> &'static str {
    if left { Y_AXIS_LEFT } else { Y_AXIS_RIGHT }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

/// Encode a plain metric as one metrics-array row.
///
/// The row is `[namespace, metricName, dim1, value1, ..., {properties}]`. The
/// trailing object carries the non-empty rendering options, the `yAxis` side and
/// finally `extra`, which wins on key collisions.
pub fn encode_metric(metric: &PlainMetric, left: bool, extra: Option<&Map<String, Value>>) -> MetricRow {
    let mut row: MetricRow = Vec::with_capacity(3 + metric.dimensions_map.len() * 2);
    row.push(Value::from(metric.namespace.as_str()));
    row.push(Value::from(metric.metric_name.as_str()));

    for (key, value) in &metric.dimensions_map {
        row.push(Value::from(key.as_str()));
        row.push(Value::from(value.as_str()));
    }

    let mut properties = Map::new();
    if let Some(color) = non_empty(metric.color.as_ref()) {
        properties.insert("color".to_string(), Value::from(color));
    }
    if let Some(label) = non_empty(metric.label.as_ref()) {
        properties.insert("label".to_string(), Value::from(label));
    }
    if let Some(period) = metric.period.filter(|p| *p != 0) {
        properties.insert("period".to_string(), Value::from(period));
    }
    if let Some(statistic) = non_empty(metric.statistic.as_ref()) {
        properties.insert("stat".to_string(), Value::from(statistic));
    }
    properties.insert("yAxis".to_string(), Value::from(y_axis(left)));

    if let Some(extra) = extra {
        for (key, value) in extra {
            properties.insert(key.clone(), value.clone());
        }
    }

    row.push(Value::Object(properties));
    row
}

/// Expand an expression into the hidden rows of its metrics followed by the expression row.
///
/// Metric rows are ordered by variable name so identical input always yields
/// identical output.
pub fn encode_expression(expression: &MetricExpression, left: bool) -> Result<Vec<MetricRow>, CompileError> {
    let mut rows = Vec::with_capacity(expression.using_metrics.len() + 1);

    for variable in expression.sorted_variables() {
        let settings = &expression.using_metrics[variable];
        let metric: PlainMetric =
            serde_json::from_str(settings).map_err(|source| CompileError::MetricDecode {
                variable: variable.to_string(),
                source,
            })?;

        let mut extra = Map::new();
        extra.insert("id".to_string(), Value::from(variable));
        extra.insert("visible".to_string(), Value::Bool(false));
        rows.push(encode_metric(&metric, left, Some(&extra)));
    }

    let mut properties = Map::new();
    properties.insert("expression".to_string(), Value::from(expression.expression.as_str()));
    if let Some(label) = non_empty(expression.label.as_ref()) {
        properties.insert("label".to_string(), Value::from(label));
    }
    if let Some(color) = non_empty(expression.color.as_ref()) {
        properties.insert("color".to_string(), Value::from(color));
    }
    rows.push(vec![Value::Object(properties)]);

    tracing::debug!(
        "expanded expression {:?} into {} rows",
        expression.expression,
        rows.len()
    );

    Ok(rows)
}

/// Rows for any metric reference: one for a plain metric, several for an expression.
pub fn encode_reference(reference: &MetricReference, left: bool) -> Result<Vec<MetricRow>, CompileError> {
    match reference {
        MetricReference::Plain(metric) => Ok(vec![encode_metric(metric, left, None)]),
        MetricReference::Expression(expression) => encode_expression(expression, left),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cpu() -> PlainMetric {
        PlainMetric::new("AWS/EC2", "CPUUtilization").with_dimension("InstanceId", "i-123")
    }

    #[test]
    fn test_plain_metric_row() {
        let row = encode_metric(&cpu(), true, None);
        assert_eq!(
            Value::Array(row),
            json!(["AWS/EC2", "CPUUtilization", "InstanceId", "i-123", {"yAxis": "left"}])
        );
    }

    #[test]
    fn test_optional_properties_included_only_when_set() {
        let row = encode_metric(&PlainMetric::new("AWS/EC2", "NetworkIn"), false, None);
        assert_eq!(Value::Array(row), json!(["AWS/EC2", "NetworkIn", {"yAxis": "right"}]));

        let metric = PlainMetric::new("AWS/EC2", "NetworkIn")
            .with_color("#0000ff")
            .with_label("Network In")
            .with_period(300)
            .with_statistic("Average");
        let row = encode_metric(&metric, false, None);
        assert_eq!(
            row.last(),
            Some(&json!({
                "color": "#0000ff",
                "label": "Network In",
                "period": 300,
                "stat": "Average",
                "yAxis": "right"
            }))
        );
    }

    #[test]
    fn test_empty_strings_are_omitted() {
        let mut metric = PlainMetric::new("AWS/EC2", "NetworkIn");
        metric.color = Some(String::new());
        metric.label = Some(String::new());

        let row = encode_metric(&metric, true, None);
        assert_eq!(row.last(), Some(&json!({"yAxis": "left"})));
    }

    #[test]
    fn test_dimensions_are_paired_in_key_order() {
        let metric = PlainMetric::new("AWS/ApplicationELB", "RequestCount")
            .with_dimension("TargetGroup", "tg-1")
            .with_dimension("LoadBalancer", "lb-1");

        let row = encode_metric(&metric, true, None);
        assert_eq!(
            &row[..6],
            &[
                json!("AWS/ApplicationELB"),
                json!("RequestCount"),
                json!("LoadBalancer"),
                json!("lb-1"),
                json!("TargetGroup"),
                json!("tg-1"),
            ]
        );
    }

    #[test]
    fn test_extra_properties_win() {
        let mut extra = Map::new();
        extra.insert("yAxis".to_string(), json!("right"));
        extra.insert("id".to_string(), json!("m1"));

        let row = encode_metric(&cpu(), true, Some(&extra));
        assert_eq!(row.last(), Some(&json!({"yAxis": "right", "id": "m1"})));
    }

    #[test]
    fn test_expression_rows_sorted_by_variable() {
        let metric_a = PlainMetric::new("AWS/EC2", "NetworkIn");
        let metric_b = PlainMetric::new("AWS/EC2", "NetworkOut");
        let expression = MetricExpression::new("a + b")
            .with_label("Total traffic")
            .with_color("#00ff00")
            .with_metric("b", metric_b.to_settings_json().unwrap())
            .with_metric("a", metric_a.to_settings_json().unwrap());

        let rows = encode_expression(&expression, true).unwrap();
        assert_eq!(
            rows.into_iter().map(Value::Array).collect::<Vec<_>>(),
            vec![
                json!(["AWS/EC2", "NetworkIn", {"yAxis": "left", "id": "a", "visible": false}]),
                json!(["AWS/EC2", "NetworkOut", {"yAxis": "left", "id": "b", "visible": false}]),
                json!([{"expression": "a + b", "label": "Total traffic", "color": "#00ff00"}]),
            ]
        );
    }

    #[test]
    fn test_expression_row_order_is_stable_across_compiles() {
        let settings = cpu().to_settings_json().unwrap();
        let expression = MetricExpression::new("m1 + m2 + m3 + m10")
            .with_metric("m3", settings.clone())
            .with_metric("m10", settings.clone())
            .with_metric("m1", settings.clone())
            .with_metric("m2", settings);

        let first = encode_expression(&expression, false).unwrap();
        for _ in 0..10 {
            assert_eq!(encode_expression(&expression, false).unwrap(), first);
        }
        let ids: Vec<&Value> = first[..4].iter().map(|row| &row.last().unwrap()["id"]).collect();
        assert_eq!(ids, vec!["m1", "m10", "m2", "m3"]);
    }

    #[test]
    fn test_expression_with_malformed_metric() {
        let expression = MetricExpression::new("m1 * 2").with_metric("m1", "not json");

        let err = encode_expression(&expression, true).unwrap_err();
        assert!(matches!(err, CompileError::MetricDecode { ref variable, .. } if variable == "m1"));
    }

    #[test]
    fn test_reference_dispatch() {
        let rows = encode_reference(&MetricReference::Plain(cpu()), false).unwrap();
        assert_eq!(rows.len(), 1);

        let expression = MetricExpression::new("SEARCH('{AWS/EC2,InstanceId}', 'Average')");
        let rows = encode_reference(&MetricReference::Expression(expression), false).unwrap();
        assert_eq!(
            rows,
            vec![vec![json!({"expression": "SEARCH('{AWS/EC2,InstanceId}', 'Average')"})]]
        );
    }
}
