use super::{Reporter, ReporterError, pretty_json};
use crate::SynthOutput;

/// Renders the synthesized document as pretty JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateReporter;

impl Reporter for TemplateReporter {
    type Artifact = String;

    fn emit(&self, output: &SynthOutput) -> Result<Self::Artifact, ReporterError> {
        pretty_json("template", &output.template)
    }
}
