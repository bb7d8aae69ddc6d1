//! The cross-document index.

use std::collections::HashMap;

use folio_core::NodeId;
use folio_core::model::{Document, DocumentMeta};

/// What other documents need to know to link to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: NodeId,
    pub title: String,
    pub output_name: String,
    pub emoji: Option<String>,
}

impl From<&DocumentMeta> for IndexEntry {
    fn from(meta: &DocumentMeta) -> Self {
        Self {
            id: meta.id.clone(),
            title: meta.title.clone(),
            output_name: meta.output_name.clone(),
            emoji: meta.emoji.clone(),
        }
    }
}

/// Lookup from document id to [`IndexEntry`].
///
/// Built in one go from every prepared document of a build, so holding one
/// means preparation is complete.
#[derive(Debug, Clone, Default)]
pub struct DocumentIndex {
    entries: HashMap<NodeId, IndexEntry>,
}

impl DocumentIndex {
    /// Indexes all prepared documents of a build.
    pub fn from_documents<'a>(documents: impl IntoIterator<Item = &'a Document>) -> Self {
        let entries = documents
            .into_iter()
            .map(|document| (document.meta.id.clone(), IndexEntry::from(&document.meta)))
            .collect();

        Self { entries }
    }

    /// Looks up a document.
    pub fn resolve(&self, id: &NodeId) -> Option<&IndexEntry> {
        self.entries.get(id)
    }

    /// Returns the number of indexed documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no document is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
