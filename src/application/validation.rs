// Validation rules for widgets, metrics and dashboard-level settings
use crate::domain::dashboard::{DashboardSpec, MAX_WIDGETS, PERIOD_OVERRIDE_AUTO, PERIOD_OVERRIDE_INHERIT};
use crate::domain::error::ValidationError;
use crate::domain::layout::{GRID_WIDTH, MAX_WIDGET_HEIGHT, WidgetSize};
use crate::domain::metric::{MetricExpression, MetricReference, PlainMetric};
use crate::domain::widget::{GraphWidget, TextWidget, WidgetSpec};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

pub const STATISTICS: &[&str] = &["SampleCount", "Average", "Sum", "Minimum", "Maximum"];
pub const LEGEND_POSITIONS: &[&str] = &["right", "bottom", "hidden"];
pub const VIEWS: &[&str] = &["timeSeries", "singleValue"];
pub const PERIOD_OVERRIDES: &[&str] = &[PERIOD_OVERRIDE_AUTO, PERIOD_OVERRIDE_INHERIT];

static PERCENTILE: LazyLock<Regex> = LazyLock::new(|| pattern(r"^p([0-9]+(?:\.[0-9]+)?)$"));
static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| pattern(r"^#[0-9A-Fa-f]{6}$"));
static TIMEZONE: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[+-]([0-9]{2})([0-9]{2})$"));
static RELATIVE_DURATION: LazyLock<Regex> = LazyLock::new(|| pattern(r"^-P(?:T[0-9]+[MH]|[0-9]+[DWM])$"));
static VARIABLE_NAME: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[a-z][a-zA-Z0-9]*$"));
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?-u:\b)[A-Za-z_][A-Za-z0-9_]*(?-u:\b)"));

// SEARCH, SELECT, METRICS and INSIGHT_RULE_METRIC select metrics by themselves, either
// leading the expression or called anywhere inside it
static SPECIAL_FORM: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)^\s*(?:SEARCH|SELECT|METRICS|INSIGHT_RULE_METRIC)(?-u:\b)|(?-u:\b)(?:SEARCH|METRICS|INSIGHT_RULE_METRIC)\s*\(",
    )
});

// https://docs.aws.amazon.com/AmazonCloudWatch/latest/monitoring/using-metric-math.html#metric-math-syntax
static EXPRESSION_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "SELECT", "FROM", "WHERE", "GROUP", "BY",
        "ABS", "ANOMALY_DETECTION_BAND", "AVG", "CEIL", "DATAPOINT_COUNT", "DB_PERF_INSIGHTS",
        "DIFF", "DIFF_TIME", "FILL", "FIRST", "LAST", "FLOOR", "IF", "INSIGHT_RULE_METRIC",
        "LAMBDA", "LOG", "LOG10", "MAX", "METRIC_COUNT", "METRICS", "MIN",
        "MINUTE", "HOUR", "DAY", "DATE", "MONTH", "YEAR", "EPOCH",
        "PERIOD", "RATE", "REMOVE_EMPTY", "RUNNING_SUM", "SEARCH", "SERVICE_QUOTA", "SLICE",
        "SORT", "STDDEV", "SUM", "TIME_SERIES",
    ]
    .into_iter()
    .collect()
});

const ISO_8601: &str = "an ISO 8601 timestamp";
const ISO_8601_OR_RELATIVE: &str =
    "an ISO 8601 timestamp or a relative time such as -PT5M, -PT8H, -P7D, -P2W or -P3M";

/// Checks a value against the rules CloudWatch enforces for it.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

pub fn validate_period(field: &'static str, period: u32) -> Result<(), ValidationError> {
    if period < 60 || period % 60 != 0 {
        return Err(ValidationError::InvalidPeriod { field, value: period });
    }
    Ok(())
}

/// Accepts the fixed statistics and percentiles `p0`..=`p100`.
pub fn validate_statistic(field: &'static str, statistic: &str) -> Result<(), ValidationError> {
    if STATISTICS.contains(&statistic) {
        return Ok(());
    }

    let is_percentile = PERCENTILE
        .captures(statistic)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .is_some_and(|p| (0.0..=100.0).contains(&p));
    if is_percentile {
        return Ok(());
    }

    Err(ValidationError::InvalidStatistic {
        field,
        value: statistic.to_string(),
    })
}

pub fn validate_enum(
    field: &'static str,
    value: &str,
    allowed: &'static [&'static str],
) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ValidationError::InvalidEnum {
        field,
        value: value.to_string(),
        allowed,
    })
}

pub fn validate_color(field: &'static str, color: &str) -> Result<(), ValidationError> {
    if !HEX_COLOR.is_match(color) {
        return Err(ValidationError::InvalidColor {
            field,
            value: color.to_string(),
        });
    }
    Ok(())
}

/// Timezone offsets look like `+0130` or `-0800`.
pub fn validate_timezone(timezone: &str) -> Result<(), ValidationError> {
    let invalid = |reason| ValidationError::InvalidTimezone {
        value: timezone.to_string(),
        reason,
    };

    let Some(caps) = TIMEZONE.captures(timezone) else {
        return Err(invalid("Must be in format +/-HHMM (e.g., +0130)"));
    };

    let hours: u8 = caps[1].parse().unwrap_or(u8::MAX);
    let minutes: u8 = caps[2].parse().unwrap_or(u8::MAX);
    if hours > 23 {
        return Err(invalid("Hours must be between 00 and 23"));
    }
    if minutes > 59 {
        return Err(invalid("Minutes must be between 00 and 59"));
    }
    Ok(())
}

/// `start` accepts an absolute timestamp or a relative duration ending now.
pub fn validate_start(start: &str) -> Result<(), ValidationError> {
    if is_iso_8601(start) || RELATIVE_DURATION.is_match(start) {
        return Ok(());
    }
    Err(ValidationError::InvalidTimeRange {
        field: "start",
        value: start.to_string(),
        expected: ISO_8601_OR_RELATIVE,
    })
}

pub fn validate_end(end: &str) -> Result<(), ValidationError> {
    if is_iso_8601(end) {
        return Ok(());
    }
    Err(ValidationError::InvalidTimeRange {
        field: "end",
        value: end.to_string(),
        expected: ISO_8601,
    })
}

pub fn validate_widget_count(count: usize) -> Result<(), ValidationError> {
    if count > MAX_WIDGETS {
        return Err(ValidationError::TooManyWidgets {
            count,
            limit: MAX_WIDGETS,
        });
    }
    Ok(())
}

pub fn validate_widget_size(size: WidgetSize) -> Result<(), ValidationError> {
    if !(1..=GRID_WIDTH).contains(&size.width) || !(1..=MAX_WIDGET_HEIGHT).contains(&size.height) {
        return Err(ValidationError::InvalidWidgetSize {
            width: size.width,
            height: size.height,
            max_width: GRID_WIDTH,
            max_height: MAX_WIDGET_HEIGHT,
        });
    }
    Ok(())
}

pub fn is_valid_variable_name(name: &str) -> bool {
    VARIABLE_NAME.is_match(name)
}

pub fn validate_variable_names<'a>(
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    let mut invalid: Vec<String> = names
        .into_iter()
        .filter(|name| !is_valid_variable_name(name))
        .map(str::to_string)
        .collect();
    if invalid.is_empty() {
        return Ok(());
    }
    invalid.sort_unstable();
    Err(ValidationError::InvalidVariableName { names: invalid })
}

/// Identifiers in `expression` that are not built-in functions or keywords,
/// deduplicated, in order of first appearance.
pub fn find_identifiers(expression: &str) -> Vec<&str> {
    let mut seen = HashSet::new();
    IDENTIFIER
        .find_iter(expression)
        .map(|word| word.as_str())
        .filter(|word| !EXPRESSION_KEYWORDS.contains(*word))
        .filter(|word| seen.insert(*word))
        .collect()
}

/// Whether the expression selects metrics by itself, so its identifiers need
/// no entry in `using_metrics`.
pub fn is_special_form(expression: &str) -> bool {
    SPECIAL_FORM.is_match(expression)
}

pub fn validate_expression_references(
    expression: &str,
    using_metrics: &HashMap<String, String>,
) -> Result<(), ValidationError> {
    if is_special_form(expression) {
        return Ok(());
    }

    let missing: Vec<String> = find_identifiers(expression)
        .into_iter()
        .filter(|id| !using_metrics.contains_key(*id))
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(ValidationError::MissingMetricReference {
        expression: expression.to_string(),
        missing,
    })
}

fn is_iso_8601(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%#z").is_ok()
        || DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M%#z").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("literal pattern compiles")
}

/// Skips unset and empty settings; both are left out of the body.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl Validate for PlainMetric {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(period) = self.period {
            validate_period("period", period)?;
        }
        if let Some(statistic) = present(&self.statistic) {
            validate_statistic("statistic", statistic)?;
        }
        if let Some(color) = present(&self.color) {
            validate_color("color", color)?;
        }
        Ok(())
    }
}

impl Validate for MetricExpression {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(period) = self.period {
            validate_period("period", period)?;
        }
        if let Some(color) = present(&self.color) {
            validate_color("color", color)?;
        }
        validate_variable_names(self.using_metrics.keys().map(String::as_str))?;
        if self.expression.trim().is_empty() {
            return Err(ValidationError::EmptyExpression);
        }
        validate_expression_references(&self.expression, &self.using_metrics)
    }
}

impl Validate for MetricReference {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            MetricReference::Plain(metric) => metric.validate(),
            MetricReference::Expression(expression) => expression.validate(),
        }
    }
}

impl Validate for TextWidget {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_widget_size(self.size())
    }
}

impl Validate for GraphWidget {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_widget_size(self.size())?;
        if let Some(period) = self.period {
            validate_period("period", period)?;
        }
        if let Some(position) = present(&self.legend_position) {
            validate_enum("legend_position", position, LEGEND_POSITIONS)?;
        }
        if let Some(statistic) = present(&self.statistic) {
            validate_statistic("statistic", statistic)?;
        }
        if let Some(timezone) = present(&self.timezone) {
            validate_timezone(timezone)?;
        }
        if let Some(view) = present(&self.view) {
            validate_enum("view", view, VIEWS)?;
        }
        self.left
            .iter()
            .chain(&self.right)
            .try_for_each(|metric| metric.validate())
    }
}

impl Validate for WidgetSpec {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            WidgetSpec::Text(widget) => widget.validate(),
            WidgetSpec::Graph(widget) => widget.validate(),
        }
    }
}

/// Dashboard-level rules only; widgets are validated one by one during compilation.
impl Validate for DashboardSpec {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_widget_count(self.widgets.len())?;
        if let Some(start) = present(&self.start) {
            validate_start(start)?;
        }
        if let Some(end) = present(&self.end) {
            validate_end(end)?;
            if present(&self.start).is_none() {
                tracing::warn!("dashboard end {} is set without a start and will be ignored by CloudWatch", end);
            }
        }
        if let Some(period_override) = present(&self.period_override) {
            validate_enum("period_override", period_override, PERIOD_OVERRIDES)?;
        }
        Ok(())
    }
}
