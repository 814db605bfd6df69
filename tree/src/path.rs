use std::{fmt, str::FromStr, sync::Arc};

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{error::TreeError, names::ConstructName};

/// Names from the root (exclusive) down to a node, e.g. `/api/proxy`.
///
/// The root path has no segments and displays as `/`.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct ConstructPath(Arc<[ConstructName]>);

impl ConstructPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[ConstructName] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn local_name(&self) -> Option<&ConstructName> {
        self.0.last()
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.0.split_last()?;
        Some(Self(Arc::from(init)))
    }

    pub fn child(&self, name: ConstructName) -> Self {
        let mut segments = self.0.to_vec();
        segments.push(name);
        Self(Arc::from(segments))
    }

    /// The dot-joined form used as logical-ID hash input (`api.proxy`).
    pub fn dotted(&self) -> String {
        let mut out = String::new();
        for (idx, segment) in self.0.iter().enumerate() {
            if idx > 0 {
                out.push('.');
            }
            out.push_str(segment.as_str());
        }
        out
    }

    pub fn starts_with(&self, prefix: &ConstructPath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for ConstructPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in self.0.iter() {
            f.write_str("/")?;
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for ConstructPath {
    type Err = TreeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let Some(rest) = input.strip_prefix('/') else {
            return Err(TreeError::InvalidPath(input.to_string()));
        };
        if rest.is_empty() {
            return Ok(Self::root());
        }
        let segments = rest
            .split('/')
            .map(ConstructName::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| TreeError::InvalidPath(input.to_string()))?;
        Ok(Self(Arc::from(segments)))
    }
}
