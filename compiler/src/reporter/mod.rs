use miette::Diagnostic;
use thiserror::Error;

use crate::SynthOutput;

pub mod template;
pub mod tree;

pub use template::TemplateReporter;
pub use tree::TreeReporter;

#[derive(Debug, Error, Diagnostic)]
#[non_exhaustive]
pub enum ReporterError {
    #[error("failed to render {artifact}: {source}")]
    #[diagnostic(code(reporter::render))]
    Render {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub trait Reporter {
    type Artifact;

    fn emit(&self, output: &SynthOutput) -> Result<Self::Artifact, ReporterError>;
}

fn pretty_json<T: serde::Serialize>(
    artifact: &'static str,
    value: &T,
) -> Result<String, ReporterError> {
    let mut out = serde_json::to_string_pretty(value)
        .map_err(|source| ReporterError::Render { artifact, source })?;
    out.push('\n');
    Ok(out)
}
