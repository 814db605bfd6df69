use std::fmt;

use crate::{ConstructPath, Declaration, Node, NodeId, Token, TokenKind, Tree, TreeError};

/// Read-only view handed to construct hooks while a tree is synthesized.
#[derive(Clone, Copy)]
pub struct ConstructContext<'a> {
    tree: &'a Tree,
    node: NodeId,
}

impl<'a> ConstructContext<'a> {
    pub fn new(tree: &'a Tree, node: NodeId) -> Self {
        Self { tree, node }
    }

    pub fn tree(&self) -> &'a Tree {
        self.tree
    }

    pub fn id(&self) -> NodeId {
        self.node
    }

    pub fn node(&self) -> &'a Node {
        self.tree.node(self.node)
    }

    pub fn path(&self) -> &'a ConstructPath {
        self.node().path()
    }

    pub fn token(&self, node: NodeId, kind: TokenKind) -> Result<Token, TreeError> {
        self.tree.token(node, kind)
    }
}

impl fmt::Debug for ConstructContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructContext")
            .field("tree", &self.tree.id())
            .field("path", self.path())
            .finish()
    }
}

/// A structural rule broken by a construct's configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// The configuration option at fault, when there is a single one.
    pub option: Option<String>,
    pub message: String,
}

impl Violation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            option: None,
            message: message.into(),
        }
    }

    pub fn for_option(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            option: Some(option.into()),
            message: message.into(),
        }
    }
}

/// Capabilities a construct kind contributes to synthesis.
///
/// Hooks only see the tree through [`ConstructContext`]; they cannot mutate it.
pub trait Construct: Send + Sync + 'static {
    /// Stable kind tag, e.g. `tessera.apigateway.Method`.
    fn kind(&self) -> &'static str;

    /// Declarations computed from the final tree, emitted after the node's eager ones.
    fn declarations(&self, _ctx: &ConstructContext<'_>) -> Vec<Declaration> {
        Vec::new()
    }

    fn validate(&self, _ctx: &ConstructContext<'_>) -> Vec<Violation> {
        Vec::new()
    }
}

/// An ad-hoc validation predicate attached to a node.
pub trait Validation: Send + Sync + 'static {
    fn validate(&self, ctx: &ConstructContext<'_>) -> Vec<Violation>;
}

impl<F> Validation for F
where
    F: Fn(&ConstructContext<'_>) -> Vec<Violation> + Send + Sync + 'static,
{
    fn validate(&self, ctx: &ConstructContext<'_>) -> Vec<Violation> {
        self(ctx)
    }
}
