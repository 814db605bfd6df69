use std::{collections::HashMap, fmt, sync::Arc};

use serde_with::SerializeDisplay;
use sha2::{Digest as _, Sha256};
use tessera_tree::{ConstructPath, NodeId, Tree};

use crate::{error::IdentifierCollisionError, options::SynthOptions};

/// Conventional names elided from the readable prefix (still hashed).
const HIDDEN_NAMES: [&str; 2] = ["Resource", "Default"];

/// Final identifier of a template entry: readable prefix plus hash suffix.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay)]
pub struct LogicalId(Arc<str>);

impl LogicalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LogicalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<LogicalId> for String {
    fn from(value: LogicalId) -> Self {
        value.0.to_string()
    }
}

/// What an ID is allocated for: a node path, plus the declaration ordinal for a node's second
/// and later declarations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AllocationKey {
    pub path: ConstructPath,
    pub ordinal: usize,
}

impl AllocationKey {
    pub fn node(path: ConstructPath) -> Self {
        Self { path, ordinal: 0 }
    }

    fn hash_input(&self) -> String {
        let mut input = self.path.dotted();
        if self.ordinal > 0 {
            input.push('#');
            input.push_str(&self.ordinal.to_string());
        }
        input
    }
}

impl fmt::Display for AllocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        if self.ordinal > 0 {
            write!(f, "#{}", self.ordinal)?;
        }
        Ok(())
    }
}

/// Compute the logical ID for `key`. Pure: same key and lengths, same ID.
pub fn compute(key: &AllocationKey, hash_len: usize, max_len: usize) -> LogicalId {
    let hash = path_hash(key, hash_len);
    let mut prefix = readable_prefix(key);
    prefix.truncate(max_len.saturating_sub(hash.len()));
    prefix.push_str(&hash);
    LogicalId(Arc::from(prefix))
}

fn readable_prefix(key: &AllocationKey) -> String {
    let mut prefix = String::new();
    for segment in key.path.segments() {
        if HIDDEN_NAMES.contains(&segment.as_str()) {
            continue;
        }
        prefix.extend(segment.as_str().chars().filter(char::is_ascii_alphanumeric));
    }
    if key.ordinal > 0 {
        prefix.push_str(&key.ordinal.to_string());
    }
    prefix
}

fn path_hash(key: &AllocationKey, hash_len: usize) -> String {
    let mut hex = hex::encode_upper(Sha256::digest(key.hash_input().as_bytes()));
    hex.truncate(hash_len);
    hex
}

/// Hands out logical IDs for one synthesis run and rejects collisions.
///
/// Allocation is idempotent: asking twice for the same key returns the same ID and
/// leaves every other key untouched. A rejected key is not recorded, so the allocator
/// stays usable and later collisions are still detected.
#[derive(Clone, Debug)]
pub struct LogicalIdAllocator {
    hash_len: usize,
    max_len: usize,
    by_key: HashMap<AllocationKey, LogicalId>,
    by_id: HashMap<LogicalId, AllocationKey>,
}

impl LogicalIdAllocator {
    pub fn new(options: &SynthOptions) -> Self {
        Self {
            hash_len: options.hash_len,
            max_len: options.max_id_len,
            by_key: HashMap::new(),
            by_id: HashMap::new(),
        }
    }

    pub fn allocate(
        &mut self,
        tree: &Tree,
        node: NodeId,
    ) -> Result<LogicalId, IdentifierCollisionError> {
        self.allocate_key(AllocationKey::node(tree.path(node).clone()))
    }

    pub fn allocate_key(
        &mut self,
        key: AllocationKey,
    ) -> Result<LogicalId, IdentifierCollisionError> {
        if let Some(id) = self.by_key.get(&key) {
            return Ok(id.clone());
        }

        let id = compute(&key, self.hash_len, self.max_len);
        if let Some(existing) = self.by_id.get(&id) {
            return Err(IdentifierCollisionError {
                logical_id: id.to_string(),
                first: existing.to_string(),
                second: key.to_string(),
            });
        }

        tracing::trace!(key = %key, logical_id = %id, "allocated logical id");
        self.by_id.insert(id.clone(), key.clone());
        self.by_key.insert(key, id.clone());
        Ok(id)
    }

    pub fn get(&self, key: &AllocationKey) -> Option<&LogicalId> {
        self.by_key.get(key)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
