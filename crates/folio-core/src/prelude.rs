//! Convenient re-exports for common use.

pub use crate::error::{BoxedError, Error, ErrorKind, Result};
pub use crate::group::{GroupPass, Grouper, group_adjacent};
pub use crate::id::{IdGenerator, NodeId};
pub use crate::model::{
    Block, BlockKind, BlockType, Document, DocumentMeta, GroupKind, RawNode, RichText,
};
