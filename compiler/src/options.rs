use bon::Builder;
use serde::Deserialize;

use crate::error::OptionsError;

pub const DEFAULT_HASH_LEN: usize = 8;
pub const DEFAULT_MAX_ID_LEN: usize = 255;

/// SHA-256 rendered as hex.
const MAX_HASH_LEN: usize = 64;
const MIN_HASH_LEN: usize = 4;

/// Knobs for one synthesis run.
///
/// Deserializable so hosts can keep them next to the rest of their configuration:
///
/// ```json
/// { "hash_len": 12, "path_metadata": true }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Builder, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthOptions {
    /// Length of the hex hash suffix of every logical ID.
    #[builder(default = DEFAULT_HASH_LEN)]
    pub hash_len: usize,
    /// Upper bound on logical ID length; the readable prefix is truncated to fit.
    #[builder(default = DEFAULT_MAX_ID_LEN)]
    pub max_id_len: usize,
    /// Record each resource's construct path under `Metadata`.
    #[builder(default)]
    pub path_metadata: bool,
    #[builder(into)]
    pub description: Option<String>,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SynthOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(MIN_HASH_LEN..=MAX_HASH_LEN).contains(&self.hash_len) {
            return Err(OptionsError {
                option: "hash_len",
                message: format!(
                    "must be between {MIN_HASH_LEN} and {MAX_HASH_LEN}, got {}",
                    self.hash_len
                ),
            });
        }
        if self.max_id_len <= self.hash_len {
            return Err(OptionsError {
                option: "max_id_len",
                message: format!(
                    "must leave room for the {}-character hash, got {}",
                    self.hash_len, self.max_id_len
                ),
            });
        }
        Ok(())
    }
}
