use std::{borrow::Borrow, fmt, sync::Arc};

use crate::error::TreeError;

/// Characters with a structural meaning in paths and logical-ID hash inputs.
const RESERVED: [(char, &str); 3] = [
    ('/', "`/` separates path segments"),
    ('.', "`.` joins path segments for hashing"),
    ('#', "`#` marks declaration ordinals"),
];

pub(crate) fn ensure_valid_name(name: &str) -> Result<(), TreeError> {
    if name.is_empty() {
        return Err(TreeError::InvalidName {
            name: name.to_string(),
            reason: "names must not be empty",
        });
    }
    for (ch, reason) in RESERVED {
        if name.contains(ch) {
            return Err(TreeError::InvalidName {
                name: name.to_string(),
                reason,
            });
        }
    }
    Ok(())
}

/// The human-assigned short name of a construct, unique among its siblings.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstructName(Arc<str>);

impl ConstructName {
    pub fn new(name: impl AsRef<str>) -> Result<Self, TreeError> {
        let name = name.as_ref();
        ensure_valid_name(name)?;
        Ok(Self(Arc::from(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ConstructName {
    type Error = TreeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ConstructName {
    type Error = TreeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConstructName> for String {
    fn from(value: ConstructName) -> Self {
        value.0.to_string()
    }
}

impl fmt::Display for ConstructName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ConstructName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ConstructName {
    fn borrow(&self) -> &str {
        &self.0
    }
}
