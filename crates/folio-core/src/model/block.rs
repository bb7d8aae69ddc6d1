//! Content blocks.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

use super::rich_text::RichText;
use crate::id::NodeId;

/// Type tag of a block.
///
/// String forms match the upstream `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Paragraph,
    #[strum(serialize = "heading_1")]
    #[serde(rename = "heading_1")]
    Heading1,
    #[strum(serialize = "heading_2")]
    #[serde(rename = "heading_2")]
    Heading2,
    #[strum(serialize = "heading_3")]
    #[serde(rename = "heading_3")]
    Heading3,
    BulletedListItem,
    NumberedListItem,
    Toggle,
    Code,
    Equation,
    Image,
    ToDo,
    Quote,
    Divider,
    Unsupported,
    BulletedList,
    NumberedList,
    Unknown,
}

/// Kinds of synthetic group nodes the grouper may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum GroupKind {
    BulletedList,
    NumberedList,
}

impl GroupKind {
    /// Returns the block kind a group of this kind carries.
    pub fn into_kind(self) -> BlockKind {
        match self {
            Self::BulletedList => BlockKind::BulletedList,
            Self::NumberedList => BlockKind::NumberedList,
        }
    }

    /// Returns the block type tag of this group kind.
    pub fn block_type(self) -> BlockType {
        match self {
            Self::BulletedList => BlockType::BulletedList,
            Self::NumberedList => BlockType::NumberedList,
        }
    }
}

/// Typed payload of a block.
///
/// Every known upstream type has a variant; anything else is kept as
/// [`BlockKind::Unknown`] with its raw payload so no content is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph(TextBlock),
    #[serde(rename = "heading_1")]
    Heading1(TextBlock),
    #[serde(rename = "heading_2")]
    Heading2(TextBlock),
    #[serde(rename = "heading_3")]
    Heading3(TextBlock),
    BulletedListItem(TextBlock),
    NumberedListItem(TextBlock),
    Toggle(TextBlock),
    Code(CodeBlock),
    Equation(EquationBlock),
    Image(ImageBlock),
    ToDo(ToDoBlock),
    Quote(TextBlock),
    Divider,
    Unsupported,
    /// Synthetic group of bulleted list items.
    BulletedList,
    /// Synthetic group of numbered list items.
    NumberedList,
    Unknown(UnknownBlock),
}

impl BlockKind {
    /// Returns the type tag of this kind.
    pub fn block_type(&self) -> BlockType {
        match self {
            Self::Paragraph(_) => BlockType::Paragraph,
            Self::Heading1(_) => BlockType::Heading1,
            Self::Heading2(_) => BlockType::Heading2,
            Self::Heading3(_) => BlockType::Heading3,
            Self::BulletedListItem(_) => BlockType::BulletedListItem,
            Self::NumberedListItem(_) => BlockType::NumberedListItem,
            Self::Toggle(_) => BlockType::Toggle,
            Self::Code(_) => BlockType::Code,
            Self::Equation(_) => BlockType::Equation,
            Self::Image(_) => BlockType::Image,
            Self::ToDo(_) => BlockType::ToDo,
            Self::Quote(_) => BlockType::Quote,
            Self::Divider => BlockType::Divider,
            Self::Unsupported => BlockType::Unsupported,
            Self::BulletedList => BlockType::BulletedList,
            Self::NumberedList => BlockType::NumberedList,
            Self::Unknown(_) => BlockType::Unknown,
        }
    }

    /// Returns the inline text carried by this kind, if any.
    pub fn rich_text(&self) -> Option<&[RichText]> {
        match self {
            Self::Paragraph(b)
            | Self::Heading1(b)
            | Self::Heading2(b)
            | Self::Heading3(b)
            | Self::BulletedListItem(b)
            | Self::NumberedListItem(b)
            | Self::Toggle(b)
            | Self::Quote(b) => Some(&b.rich_text),
            Self::Code(b) => Some(&b.rich_text),
            Self::ToDo(b) => Some(&b.rich_text),
            Self::Image(b) => Some(&b.caption),
            Self::Equation(_)
            | Self::Divider
            | Self::Unsupported
            | Self::BulletedList
            | Self::NumberedList
            | Self::Unknown(_) => None,
        }
    }
}

/// A block with inline text only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default, alias = "text")]
    pub rich_text: Vec<RichText>,
}

impl TextBlock {
    /// Creates a text block from inline runs.
    pub fn new(rich_text: Vec<RichText>) -> Self {
        Self { rich_text }
    }

    /// Creates a text block holding one plain run.
    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(vec![RichText::plain(content)])
    }
}

/// A code listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    #[serde(default, alias = "text")]
    pub rich_text: Vec<RichText>,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "plain text".to_owned()
}

/// A display equation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquationBlock {
    pub expression: String,
}

/// An image hosted upstream or externally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    #[serde(flatten)]
    pub source: FileSource,
    #[serde(default)]
    pub caption: Vec<RichText>,
}

/// Where a file lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileSource {
    /// Hosted by the document store, behind an expiring URL.
    File { file: FileUrl },
    /// Hosted elsewhere.
    External { external: FileUrl },
}

impl FileSource {
    /// Returns the URL of the file.
    pub fn url(&self) -> &str {
        match self {
            Self::File { file } => &file.url,
            Self::External { external } => &external.url,
        }
    }
}

/// URL of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUrl {
    pub url: String,
}

/// A checklist entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToDoBlock {
    #[serde(default, alias = "text")]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub checked: bool,
}

/// A block of a type we do not model, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownBlock {
    /// Upstream type tag.
    pub name: String,
    /// Upstream payload stored under the type tag.
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// A node of the content tree.
///
/// Synthetic group nodes use the same shape: consumers only look at
/// [`Block::kind`] and [`Block::children`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: NodeId,
    pub has_children: bool,
    pub kind: BlockKind,
    #[serde(default)]
    pub children: Vec<Block>,
}

impl Block {
    /// Creates a leaf block.
    pub fn new(id: impl Into<NodeId>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            has_children: false,
            kind,
            children: Vec::new(),
        }
    }

    /// Creates a synthetic group node wrapping `children`.
    pub fn group(id: NodeId, kind: GroupKind, children: Vec<Block>) -> Self {
        Self {
            id,
            has_children: true,
            kind: kind.into_kind(),
            children,
        }
    }

    /// Attaches children, updating `has_children` accordingly.
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.has_children = !children.is_empty();
        self.children = children;
        self
    }

    /// Returns the type tag of this block.
    pub fn block_type(&self) -> BlockType {
        self.kind.block_type()
    }

    /// Iterates over this block and all of its descendants, depth first.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Depth-first iterator returned by [`Block::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Block>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.stack.pop()?;
        self.stack.extend(block.children.iter().rev());
        Some(block)
    }
}
