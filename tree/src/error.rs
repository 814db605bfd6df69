use miette::Diagnostic;
use thiserror::Error;

use crate::{ConstructPath, NodeId};

/// A construct with this name already exists under the same parent.
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
#[error("there is already a construct named `{name}` under {parent}")]
#[diagnostic(
    code(tree::duplicate_name),
    help("Construct names only need to be unique among siblings; pick another name for this one.")
)]
pub struct DuplicateNameError {
    pub parent: ConstructPath,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
#[non_exhaustive]
pub enum TreeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    DuplicateName(#[from] DuplicateNameError),

    #[error("invalid construct name `{name}`: {reason}")]
    #[diagnostic(code(tree::invalid_name))]
    InvalidName { name: String, reason: &'static str },

    #[error("invalid construct path `{0}`")]
    #[diagnostic(code(tree::invalid_path), help("Paths look like `/parent/child`."))]
    InvalidPath(String),

    #[error("node {0} does not belong to this tree")]
    #[diagnostic(code(tree::unknown_node))]
    UnknownNode(NodeId),

    #[error("cannot modify {path}: synthesis has already started for this tree")]
    #[diagnostic(
        code(tree::sealed),
        help("Build the whole construct tree before synthesizing it.")
    )]
    Sealed { path: ConstructPath },

    #[error("{path} already defines a template parameter")]
    #[diagnostic(code(tree::parameter_already_defined))]
    ParameterAlreadyDefined { path: ConstructPath },

    #[error("{path} already defines a template output")]
    #[diagnostic(code(tree::output_already_defined))]
    OutputAlreadyDefined { path: ConstructPath },
}
