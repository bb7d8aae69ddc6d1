//! Node identifiers and the deterministic identifier generator.
//!
//! Upstream identifiers are UUIDs that may arrive either dashed
//! (`c3d85220-62aa-457a-b414-90c5e9929790`) or compact
//! (`c3d8522062aa457ab41490c5e9929790`, as found in relative links).
//! [`NodeId`] stores the canonical dashed form so both spellings key the same
//! document.

use std::sync::atomic::{AtomicU64, Ordering};

use derive_more::Display;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Identifier of a block or document.
#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NodeId(String);

impl NodeId {
    /// Creates an identifier, canonicalizing UUID-shaped input.
    ///
    /// Anything that is not a UUID is kept verbatim.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match Uuid::try_parse(raw.trim()) {
            Ok(uuid) => Self(uuid.hyphenated().to_string()),
            Err(_) => Self(raw),
        }
    }

    /// Parses a UUID-shaped identifier, returning `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::try_parse(raw.trim())
            .ok()
            .map(|uuid| Self(uuid.hyphenated().to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the identifier without dashes.
    pub fn compact(&self) -> String {
        self.0.replace('-', "")
    }

    /// Returns the first eight characters of the compact form.
    pub fn short(&self) -> String {
        self.compact().chars().take(8).collect()
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<NodeId> for String {
    fn from(value: NodeId) -> Self {
        value.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Produces identifiers for synthetic nodes.
///
/// Each call hashes the build seed followed by a counter that starts at 1 and
/// advances exactly once per call. Two generators built from the same seed
/// therefore yield the same sequence, which keeps group ids stable across
/// rebuilds as long as the traversal order is the same.
#[derive(Debug)]
pub struct IdGenerator {
    seed: String,
    counter: AtomicU64,
}

impl IdGenerator {
    /// Creates a generator for the given build seed.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the seed is empty.
    pub fn new(seed: impl Into<String>) -> Result<Self> {
        let seed = seed.into();
        if seed.trim().is_empty() {
            return Err(Error::configuration().with_message("build seed must not be empty"));
        }

        Ok(Self {
            seed,
            counter: AtomicU64::new(1),
        })
    }

    /// Returns the next identifier.
    pub fn next_id(&self) -> NodeId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);

        let mut hasher = Sha256::new();
        hasher.update(self.seed.as_bytes());
        hasher.update(n.to_string().as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        NodeId(Uuid::from_bytes(bytes).hyphenated().to_string())
    }

    /// Returns how many identifiers have been handed out.
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::SeqCst) - 1
    }
}
