//! Resource constructs for the tessera construct tree.
//!
//! Each construct attaches itself under a scope node, declares its resources eagerly
//! (or lazily, when they depend on the finished tree) and hands out tokens other
//! constructs can embed in their own properties.

use tessera_tree::Construct;

pub mod apigateway;
pub mod iam;
pub mod lambda;
mod output;
mod parameter;

pub use output::{CfnOutput, CfnOutputProps};
pub use parameter::{CfnParameter, CfnParameterProps};
pub use tessera_tree::Pseudo;

/// Name of the child node that owns a construct's primary resource.
pub(crate) const RESOURCE: &str = "Resource";

/// A construct that only contributes its kind tag; its resources are declared eagerly.
pub(crate) struct Kind(pub &'static str);

impl Construct for Kind {
    fn kind(&self) -> &'static str {
        self.0
    }
}
