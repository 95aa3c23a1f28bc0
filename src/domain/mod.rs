// Domain layer - Widget, metric and dashboard body models
pub mod dashboard;
pub mod error;
pub mod layout;
pub mod metric;
pub mod widget;

pub(crate) mod serde_helpers;
