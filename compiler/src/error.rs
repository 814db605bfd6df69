use std::fmt;

use miette::Diagnostic;
use tessera_tree::{ConstructPath, TreeId};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
#[non_exhaustive]
pub enum SynthError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Unresolvable(#[from] UnresolvableReferences),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Collisions(#[from] IdentifierCollisions),
}

#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
#[error("invalid synthesis option `{option}`: {message}")]
#[diagnostic(code(synth::invalid_option))]
pub struct OptionsError {
    pub option: &'static str,
    pub message: String,
}

/// One rule broken by one construct.
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
#[error("{path}: {message}{}", option_note(.option))]
#[diagnostic(code(synth::validation_failure))]
pub struct ValidationFailure {
    pub path: ConstructPath,
    pub option: Option<String>,
    pub message: String,
}

fn option_note(option: &Option<String>) -> String {
    option
        .as_ref()
        .map(|option| format!(" (option `{option}`)"))
        .unwrap_or_default()
}

/// Every validation failure found in the tree.
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
#[error("construct validation failed:\n{}", bullet_list(.failures))]
#[diagnostic(
    code(synth::validation),
    help("Fix every listed construct; nothing was emitted.")
)]
pub struct ValidationError {
    #[related]
    pub failures: Vec<ValidationFailure>,
}

/// Why a token could not be turned into a native expression.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DanglingReason {
    /// The token was minted by a different tree.
    ForeignTree(TreeId),
    /// No node at the producer path.
    UnknownProducer,
    /// The producer owns no resource declaration.
    NoResource,
    /// The producer owns no parameter.
    NoParameter,
}

impl fmt::Display for DanglingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DanglingReason::ForeignTree(origin) => {
                write!(f, "belongs to another construct tree ({origin})")
            }
            DanglingReason::UnknownProducer => f.write_str("is not attached to this tree"),
            DanglingReason::NoResource => f.write_str("owns no resource declaration"),
            DanglingReason::NoParameter => f.write_str("owns no template parameter"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
#[error("{consumer} references {producer} via `{token}`, but {producer} {reason}")]
#[diagnostic(
    code(synth::unresolvable_reference),
    help("Only reference constructs that live in the same tree and emit something to refer to.")
)]
pub struct UnresolvableReferenceError {
    pub consumer: ConstructPath,
    pub producer: ConstructPath,
    pub token: String,
    pub reason: DanglingReason,
}

/// Every dangling reference found during resolution.
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
#[error("unresolvable references:\n{}", bullet_list(.errors))]
#[diagnostic(code(synth::unresolvable_references))]
pub struct UnresolvableReferences {
    #[related]
    pub errors: Vec<UnresolvableReferenceError>,
}

#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
#[error("logical ID `{logical_id}` is produced by both {first} and {second}")]
#[diagnostic(
    code(synth::identifier_collision),
    help("Rename one of the constructs; logical IDs are never renamed automatically.")
)]
pub struct IdentifierCollisionError {
    pub logical_id: String,
    pub first: String,
    pub second: String,
}

/// Every logical ID claimed more than once in one run.
///
/// Resolution still runs after a collision, so references that failed to resolve in the
/// same run are carried along instead of being lost.
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
#[error(
    "logical ID collisions:\n{}{}",
    bullet_list(.collisions),
    unresolved_note(.unresolvable)
)]
#[diagnostic(
    code(synth::identifier_collisions),
    help("Rename the listed constructs; logical IDs are never renamed automatically.")
)]
pub struct IdentifierCollisions {
    #[related]
    pub collisions: Vec<IdentifierCollisionError>,
    pub unresolvable: Vec<UnresolvableReferenceError>,
}

fn unresolved_note(errors: &[UnresolvableReferenceError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    format!("\nalso unresolvable:\n{}", bullet_list(errors))
}

fn bullet_list<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
