use std::path::Path;

use cloudwatch_dashboard_body::infrastructure::config::{compile_definition, load_dashboard_definition};
use cloudwatch_dashboard_body::{
    CompileError, DashboardCompiler, DashboardSpec, GraphWidget, MetricExpression, PlainMetric, TextWidget,
    ValidationError, WidgetSpec, decode_widget,
};
use serde_json::{Value, json};

fn compile(spec: &DashboardSpec) -> Value {
    let body = DashboardCompiler::new().compile(spec).expect("dashboard should compile");
    serde_json::from_str(&body).expect("body should be valid JSON")
}

#[test]
fn test_compile_text_and_graph_dashboard() {
    let mut graph = GraphWidget::new(8, 6, "us-east-1");
    graph
        .left
        .push(PlainMetric::new("AWS/EC2", "CPUUtilization").with_dimension("InstanceId", "i-123").into());

    let mut spec = DashboardSpec::new(vec![
        TextWidget::new(8, 6, "# Test Header").with_background("#ffffff").into(),
        graph.into(),
    ]);
    spec.start = Some("2024-01-01T00:00:00Z".to_string());
    spec.end = Some("2024-01-02T00:00:00Z".to_string());
    spec.period_override = Some("auto".to_string());

    assert_eq!(
        compile(&spec),
        json!({
            "widgets": [
                {
                    "type": "text", "x": 0, "y": 0, "width": 8, "height": 6,
                    "properties": {"markdown": "# Test Header", "background": "#ffffff"}
                },
                {
                    "type": "metric", "x": 8, "y": 0, "width": 8, "height": 6,
                    "properties": {
                        "metrics": [["AWS/EC2", "CPUUtilization", "InstanceId", "i-123", {"yAxis": "left"}]],
                        "region": "us-east-1"
                    }
                }
            ],
            "start": "2024-01-01T00:00:00Z",
            "end": "2024-01-02T00:00:00Z",
            "periodOverride": "auto"
        })
    );
}

#[test]
fn test_identical_input_compiles_to_identical_output() {
    let build = || {
        let settings = |name: &str| PlainMetric::new("AWS/SQS", name).to_settings_json().unwrap();
        let mut graph = GraphWidget::new(12, 6, "eu-west-1");
        graph.left.push(
            MetricExpression::new("sent - deleted")
                .with_metric("sent", settings("NumberOfMessagesSent"))
                .with_metric("deleted", settings("NumberOfMessagesDeleted"))
                .into(),
        );
        DashboardSpec::new(vec![graph.into()])
    };

    let compiler = DashboardCompiler::new();
    let first = compiler.compile(&build()).unwrap();
    for _ in 0..20 {
        assert_eq!(compiler.compile(&build()).unwrap(), first);
    }

    let body: Value = serde_json::from_str(&first).unwrap();
    let metrics = &body["widgets"][0]["properties"]["metrics"];
    assert_eq!(metrics[0][1], json!("NumberOfMessagesDeleted"));
    assert_eq!(metrics[0][2]["id"], json!("deleted"));
    assert_eq!(metrics[1][2]["id"], json!("sent"));
    assert_eq!(metrics[2], json!([{"expression": "sent - deleted"}]));
}

#[test]
fn test_too_many_widgets_fails() {
    let widgets: Vec<WidgetSpec> = (0..501).map(|_| TextWidget::new(4, 2, "x").into()).collect();

    let err = DashboardCompiler::new().compile(&DashboardSpec::new(widgets)).unwrap_err();
    assert!(matches!(
        err.validation(),
        Some(ValidationError::TooManyWidgets { limit: 500, .. })
    ));
}

#[test]
fn test_missing_metric_reference_names_only_unresolved() {
    let mut graph = GraphWidget::new(12, 6, "us-east-1");
    graph.left.push(
        MetricExpression::new("m1 + m3")
            .with_metric("m1", PlainMetric::new("AWS/EC2", "NetworkIn").to_settings_json().unwrap())
            .into(),
    );

    let err = DashboardCompiler::new().compile(&DashboardSpec::new(vec![graph.into()])).unwrap_err();
    match err.validation() {
        Some(ValidationError::MissingMetricReference { missing, .. }) => assert_eq!(missing, &["m3"]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_decoded_documents_compile() {
    let widgets = [
        r##"{"type":"text","markdown":"# Test Header","background":"#ffffff","width":8,"height":6}"##,
        r#"{"type":"graph","width":8,"height":6,"region":"us-east-1","left":["{\"type\":\"metric\",\"namespace\":\"AWS/EC2\",\"metricName\":\"CPUUtilization\",\"dimensionsMap\":{\"InstanceId\":\"i-123\"}}"]}"#,
    ]
    .into_iter()
    .map(decode_widget)
    .collect::<Result<Vec<_>, _>>()
    .unwrap();

    let body = compile(&DashboardSpec::new(widgets));
    assert_eq!(body["widgets"][1]["x"], json!(8));
    assert_eq!(
        body["widgets"][1]["properties"]["metrics"][0],
        json!(["AWS/EC2", "CPUUtilization", "InstanceId", "i-123", {"yAxis": "left"}])
    );
}

#[test]
fn test_unsupported_widget_document() {
    let err = decode_widget(r#"{"type":"log","width":6,"height":6,"query":"fields @message"}"#).unwrap_err();
    assert!(matches!(err, CompileError::UnsupportedWidgetType(kind) if kind == "log"));
}

#[test]
fn test_compile_definition_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/dashboard.toml");
    let definition = load_dashboard_definition(&path).unwrap();

    let body = compile_definition(definition, &DashboardCompiler::new()).unwrap();
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(body["start"], json!("-PT3H"));
    assert_eq!(body["periodOverride"], json!("inherit"));

    let widgets = body["widgets"].as_array().unwrap();
    let positions: Vec<(u64, u64)> = widgets
        .iter()
        .map(|w| (w["x"].as_u64().unwrap(), w["y"].as_u64().unwrap()))
        .collect();
    assert_eq!(positions, vec![(0, 0), (12, 0), (0, 6)]);

    assert_eq!(widgets[1]["properties"]["stat"], json!("p99"));
    let error_rate = widgets[2]["properties"]["metrics"].as_array().unwrap();
    assert_eq!(error_rate.len(), 3);
    assert_eq!(error_rate[0][1], json!("HTTPCode_Target_5XX_Count"));
    assert_eq!(error_rate[0][2], json!({"id": "errors", "stat": "Sum", "visible": false, "yAxis": "right"}));
    assert_eq!(error_rate[2], json!([{"expression": "100 * errors / requests", "label": "Error %"}]));
}
