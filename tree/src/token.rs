use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::ConstructPath;

/// Process-unique identity of one construct tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreeId(u64);

impl TreeId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    /// The producer's own logical ID.
    IdentifierOf,
    /// A named attribute of the producer's resource (e.g. `Arn`).
    AttributeOf(String),
    /// The value of a template parameter owned by the producer.
    ValueOf,
}

/// Placeholder for a value that is only known once the tree is synthesized.
///
/// Tokens are immutable and cheap to clone; many tokens may point at the same producer.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token {
    origin: TreeId,
    producer: ConstructPath,
    kind: TokenKind,
}

impl Token {
    pub fn new(origin: TreeId, producer: ConstructPath, kind: TokenKind) -> Self {
        Self {
            origin,
            producer,
            kind,
        }
    }

    pub fn origin(&self) -> TreeId {
        self.origin
    }

    pub fn producer(&self) -> &ConstructPath {
        &self.producer
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::IdentifierOf => write!(f, "${{ref:{}}}", self.producer),
            TokenKind::AttributeOf(attribute) => {
                write!(f, "${{attr:{}#{attribute}}}", self.producer)
            }
            TokenKind::ValueOf => write!(f, "${{value:{}}}", self.producer),
        }
    }
}
