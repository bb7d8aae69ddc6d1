//! Serialized grouped trees.

use folio_core::NodeId;
use folio_core::model::{Document, DocumentMeta};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Format version written into every snapshot.
///
/// Snapshots with any other version are ignored and rebuilt.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A cached, grouped document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub document: Document,
}

/// Only the version, decoded before the rest of the snapshot.
#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotHeader {
    pub version: u32,
}

impl Snapshot {
    /// Creates a snapshot of a grouped document.
    pub fn new(document: Document) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            document,
        }
    }

    /// Returns the id of the cached document.
    pub fn id(&self) -> &NodeId {
        &self.document.meta.id
    }

    /// Returns the upstream modification time the snapshot was built from.
    pub fn last_modified(&self) -> Timestamp {
        self.document.meta.last_modified
    }

    /// Combines the cached tree with fresh metadata.
    pub fn into_document(self, meta: DocumentMeta) -> Document {
        Document::new(meta, self.document.blocks)
    }
}
