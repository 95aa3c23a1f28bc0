// Dashboard compiler - Use case for building a CloudWatch dashboard body
use crate::application::validation::Validate;
use crate::application::widget_encoder::EncodeWidget;
use crate::domain::dashboard::{DashboardBody, DashboardSpec, RenderedWidget};
use crate::domain::error::CompileError;
use crate::domain::layout::GridPosition;

#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardCompiler {
    pretty: bool,
}

impl DashboardCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit indented JSON instead of the compact form.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Validate, lay out and render every widget, in order.
    ///
    /// Stops at the first failing widget; the error names its index and kind.
    pub fn compile_body(&self, spec: &DashboardSpec) -> Result<DashboardBody, CompileError> {
        spec.validate()?;

        let (widgets, _) = spec.widgets.iter().enumerate().try_fold(
            (Vec::with_capacity(spec.widgets.len()), None::<GridPosition>),
            |(mut rendered, previous): (Vec<RenderedWidget>, _), (index, widget)| {
                widget
                    .validate()
                    .map_err(|e| CompileError::from(e).in_widget(index, widget.kind()))?;
                let widget_body = widget
                    .to_dashboard_widget(previous)
                    .map_err(|e| e.in_widget(index, widget.kind()))?;

                let position = widget_body.position();
                rendered.push(widget_body);
                Ok::<_, CompileError>((rendered, Some(position)))
            },
        )?;

        Ok(DashboardBody {
            widgets,
            start: non_empty(&spec.start),
            end: non_empty(&spec.end),
            period_override: non_empty(&spec.period_override),
        })
    }

    /// Compile the dashboard into the JSON string CloudWatch expects as `DashboardBody`.
    pub fn compile(&self, spec: &DashboardSpec) -> Result<String, CompileError> {
        let body = self.compile_body(spec)?;
        let json = if self.pretty {
            serde_json::to_string_pretty(&body)
        } else {
            serde_json::to_string(&body)
        }
        .map_err(CompileError::Encode)?;

        tracing::info!(
            "built dashboard body with {} widgets ({} bytes)",
            body.widgets.len(),
            json.len()
        );
        Ok(json)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}
