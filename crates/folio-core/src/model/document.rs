//! Documents and their metadata.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::block::Block;
use crate::id::NodeId;

/// Metadata of a document, as listed by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Document identifier.
    pub id: NodeId,
    /// Human-readable title.
    pub title: String,
    /// Output file name, including the extension.
    pub output_name: String,
    /// Last modification time upstream.
    pub last_modified: Timestamp,
    /// Icon emoji, if the document has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl DocumentMeta {
    /// Creates metadata using the default output name for `id`.
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>, last_modified: Timestamp) -> Self {
        let id = id.into();
        Self {
            output_name: Self::default_output_name(&id),
            id,
            title: title.into(),
            last_modified,
            emoji: None,
        }
    }

    /// Returns the output name used when no explicit one is set.
    pub fn default_output_name(id: &NodeId) -> String {
        format!("{}.html", id.short())
    }

    /// Overrides the output name.
    pub fn with_output_name(mut self, output_name: impl Into<String>) -> Self {
        self.output_name = output_name.into();
        self
    }

    /// Sets the icon emoji.
    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }
}

/// A document and its (possibly grouped) content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub meta: DocumentMeta,
    pub blocks: Vec<Block>,
}

impl Document {
    /// Creates a document.
    pub fn new(meta: DocumentMeta, blocks: Vec<Block>) -> Self {
        Self { meta, blocks }
    }

    /// Returns the document identifier.
    pub fn id(&self) -> &NodeId {
        &self.meta.id
    }

    /// Counts every node of the content tree.
    pub fn block_count(&self) -> usize {
        self.blocks.iter().map(|b| b.descendants().count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockKind, TextBlock};

    #[test]
    fn test_default_output_name() {
        let meta = DocumentMeta::new(
            "c3d85220-62aa-457a-b414-90c5e9929790",
            "Title",
            Timestamp::UNIX_EPOCH,
        );
        assert_eq!(meta.output_name, "c3d85220.html");

        let meta = meta.with_output_name("index.html");
        assert_eq!(meta.output_name, "index.html");
    }

    #[test]
    fn test_block_count_includes_nested_blocks() {
        let toggle = Block::new("t", BlockKind::Toggle(TextBlock::plain("t")))
            .with_children(vec![Block::new("c", BlockKind::Divider)]);
        let document = Document::new(
            DocumentMeta::new("d", "Doc", Timestamp::UNIX_EPOCH),
            vec![toggle, Block::new("p", BlockKind::Divider)],
        );

        assert_eq!(document.block_count(), 3);
    }
}
