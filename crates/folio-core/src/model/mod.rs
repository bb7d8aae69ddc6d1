//! Document model: typed blocks, inline rich text and document metadata.

mod block;
mod document;
mod raw;
mod rich_text;

pub use block::{
    Block, BlockKind, BlockType, CodeBlock, Descendants, EquationBlock, FileSource, FileUrl,
    GroupKind, ImageBlock, TextBlock, ToDoBlock, UnknownBlock,
};
pub use document::{Document, DocumentMeta};
pub use raw::RawNode;
pub use rich_text::{
    Annotations, DateMention, Equation, Link, Mention, PageReference, RichText, TextContent,
    concatenate,
};
