// Error types for dashboard compilation
use thiserror::Error;

/// A rule violated by a widget, metric or dashboard setting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be 60 or a multiple of 60, got: {value}")]
    InvalidPeriod { field: &'static str, value: u32 },

    #[error(
        "{field} must be one of 'SampleCount', 'Average', 'Sum', 'Minimum', 'Maximum', or a percentile (p0-p100), got: {value}"
    )]
    InvalidStatistic { field: &'static str, value: String },

    #[error("{field} must be one of {}, got: {value}", .allowed.join(", "))]
    InvalidEnum {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("invalid color format for {field}: {value}, must be a six-digit hex color code (e.g., #FF0000)")]
    InvalidColor { field: &'static str, value: String },

    #[error("invalid timezone: {value}. {reason}")]
    InvalidTimezone { value: String, reason: &'static str },

    #[error("{field} must be {expected}, got: {value}")]
    InvalidTimeRange {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("maximum number of widgets is {limit}. Got {count}")]
    TooManyWidgets { count: usize, limit: usize },

    #[error(
        "invalid widget size {width}x{height}: width must be between 1 and {max_width} and height between 1 and {max_height}"
    )]
    InvalidWidgetSize {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error(
        "invalid variable names in expression: [{}]. Must start with lowercase letter and only contain alphanumerics",
        .names.join(" ")
    )]
    InvalidVariableName { names: Vec<String> },

    #[error("expression cannot be empty")]
    EmptyExpression,

    #[error("missing metrics in using_metrics: [{}]", .missing.join(" "))]
    MissingMetricReference { expression: String, missing: Vec<String> },
}

/// Failure of a whole dashboard compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unsupported widget type: {0}")]
    UnsupportedWidgetType(String),

    #[error("unsupported metric type: {0}")]
    UnsupportedMetricType(String),

    #[error("failed to decode metric '{variable}' used in expression")]
    MetricDecode {
        variable: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {what} definition")]
    DefinitionDecode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{what} definition has no \"type\" field")]
    MissingType { what: &'static str },

    #[error("failed to encode dashboard body")]
    Encode(#[source] serde_json::Error),

    #[error("widget #{index} ({kind}) is invalid")]
    Widget {
        index: usize,
        kind: &'static str,
        #[source]
        source: Box<CompileError>,
    },
}

impl CompileError {
    pub(crate) fn in_widget(self, index: usize, kind: &'static str) -> Self {
        CompileError::Widget {
            index,
            kind,
            source: Box::new(self),
        }
    }

    /// The underlying error, with any widget context stripped.
    pub fn root(&self) -> &CompileError {
        match self {
            CompileError::Widget { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn validation(&self) -> Option<&ValidationError> {
        match self.root() {
            CompileError::Validation(e) => Some(e),
            _ => None,
        }
    }
}
