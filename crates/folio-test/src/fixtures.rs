//! Short constructors for test content.

use folio_core::NodeId;
use folio_core::model::{Block, BlockKind, DocumentMeta, RichText, TextBlock};
use jiff::Timestamp;

/// Document metadata modified `seconds` after the epoch.
pub fn meta(id: &str, title: &str, seconds: i64) -> DocumentMeta {
    let modified = Timestamp::from_second(seconds).unwrap_or(Timestamp::UNIX_EPOCH);
    DocumentMeta::new(id, title, modified)
}

/// A paragraph with plain text.
pub fn paragraph(id: &str, text: &str) -> Block {
    Block::new(id, BlockKind::Paragraph(TextBlock::plain(text)))
}

/// A paragraph with arbitrary inline content.
pub fn rich_paragraph(id: &str, texts: Vec<RichText>) -> Block {
    Block::new(id, BlockKind::Paragraph(TextBlock::new(texts)))
}

/// A bulleted list item.
pub fn bullet(id: &str, text: &str) -> Block {
    Block::new(id, BlockKind::BulletedListItem(TextBlock::plain(text)))
}

/// A numbered list item.
pub fn numbered(id: &str, text: &str) -> Block {
    Block::new(id, BlockKind::NumberedListItem(TextBlock::plain(text)))
}

/// A toggle holding `children`.
pub fn toggle(id: &str, text: &str, children: Vec<Block>) -> Block {
    Block::new(id, BlockKind::Toggle(TextBlock::plain(text))).with_children(children)
}

/// A page mention of `target`.
pub fn mention(target: &str) -> RichText {
    RichText::page_mention(NodeId::new(target))
}
