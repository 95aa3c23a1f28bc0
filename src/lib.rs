//! Compiles typed widget definitions into the JSON body of a CloudWatch dashboard.
//!
//! Widgets are validated, placed on the 24-column grid one after another and
//! rendered with the metric-array encoding the dashboard API expects.
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::dashboard_compiler::DashboardCompiler;
pub use application::validation::Validate;
pub use application::widget_encoder::EncodeWidget;
pub use domain::dashboard::{DashboardBody, DashboardSpec, RenderedWidget};
pub use domain::error::{CompileError, ValidationError};
pub use domain::layout::{GRID_WIDTH, GridPosition, MAX_WIDGET_HEIGHT, WidgetSize, place};
pub use domain::metric::{MetricExpression, MetricReference, PlainMetric};
pub use domain::widget::{GraphWidget, TextWidget, WidgetSpec, YAxisSettings};
pub use infrastructure::definition::{decode_metric, decode_widget};
