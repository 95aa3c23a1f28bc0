use crate::application::dashboard_compiler::DashboardCompiler;
use crate::domain::dashboard::DashboardSpec;
use crate::domain::error::CompileError;
use crate::infrastructure::definition::decode_widget;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Prefix of environment variables overriding dashboard-level settings.
pub const ENV_PREFIX: &str = "DASHBOARD";

/// A dashboard as written in a definition file.
///
/// Each entry of `widgets` is a widget settings document (a JSON string), the
/// same form the host hands over.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardDefinition {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub period_override: Option<String>,
    #[serde(default)]
    pub widgets: Vec<String>,
}

impl DashboardDefinition {
    /// Decode every widget document, keeping their order.
    pub fn into_spec(self) -> Result<DashboardSpec, CompileError> {
        let widgets = self
            .widgets
            .iter()
            .enumerate()
            .map(|(index, document)| {
                decode_widget(document).map_err(|e| e.in_widget(index, "widget document"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DashboardSpec {
            widgets,
            start: self.start,
            end: self.end,
            period_override: self.period_override,
        })
    }
}

/// Load a definition file; its format follows the file extension.
///
/// `DASHBOARD_START`, `DASHBOARD_END` and `DASHBOARD_PERIOD_OVERRIDE` override
/// the values from the file.
pub fn load_dashboard_definition(path: &Path) -> anyhow::Result<DashboardDefinition> {
    load_with_environment(path, config::Environment::with_prefix(ENV_PREFIX))
}

fn load_with_environment(path: &Path, environment: config::Environment) -> anyhow::Result<DashboardDefinition> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment)
        .build()
        .with_context(|| format!("failed to read dashboard definition {}", path.display()))?;

    let definition: DashboardDefinition = settings
        .try_deserialize()
        .with_context(|| format!("invalid dashboard definition {}", path.display()))?;

    tracing::debug!(
        "loaded dashboard definition {} with {} widgets",
        path.display(),
        definition.widgets.len()
    );
    Ok(definition)
}

/// Decode and compile a loaded definition.
pub fn compile_definition(
    definition: DashboardDefinition,
    compiler: &DashboardCompiler,
) -> Result<String, CompileError> {
    compiler.compile(&definition.into_spec()?)
}
