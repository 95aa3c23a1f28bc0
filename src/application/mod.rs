// Application layer - Validation, encoding and the dashboard compile use case
pub mod dashboard_compiler;
pub mod metric_encoder;
pub mod validation;
pub mod widget_encoder;
