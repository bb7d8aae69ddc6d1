//! Untyped nodes as delivered by the document store.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::block::{
    Block, BlockKind, BlockType, CodeBlock, EquationBlock, ImageBlock, TextBlock, ToDoBlock,
    UnknownBlock,
};
use crate::TRACING_TARGET;
use crate::id::NodeId;

/// A node exactly as the store returns it.
///
/// The type-specific payload lives under a key named after `type`, next to
/// metadata we do not use (`object`, `created_time`, ...). All of it is kept
/// in `fields` until [`RawNode::into_kind`] picks the payload out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawNode {
    /// Creates a raw node with the given payload stored under its type key.
    pub fn new(id: impl Into<NodeId>, type_name: impl Into<String>, payload: Value) -> Self {
        let type_name = type_name.into();
        let mut fields = Map::new();
        fields.insert(type_name.clone(), payload);

        Self {
            id: id.into(),
            type_name,
            has_children: false,
            fields,
        }
    }

    /// Marks whether the node has children upstream.
    pub fn with_has_children(mut self, has_children: bool) -> Self {
        self.has_children = has_children;
        self
    }

    /// Returns the type-specific payload, if present.
    pub fn payload(&self) -> Option<&Value> {
        self.fields.get(&self.type_name)
    }

    /// Converts the payload into a typed block kind.
    ///
    /// Unrecognized types and payloads that fail to parse become
    /// [`BlockKind::Unknown`], keeping the raw payload.
    pub fn into_kind(mut self) -> BlockKind {
        let payload = self
            .fields
            .remove(&self.type_name)
            .unwrap_or_else(|| Value::Object(Map::new()));

        let block_type = match BlockType::from_str(&self.type_name) {
            Ok(block_type) => block_type,
            Err(_) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    block_id = %self.id,
                    block_type = %self.type_name,
                    "Unrecognized block type"
                );
                return unknown(self.type_name, payload);
            }
        };

        let parsed = match block_type {
            BlockType::Paragraph => TextBlock::deserialize(&payload).map(BlockKind::Paragraph),
            BlockType::Heading1 => TextBlock::deserialize(&payload).map(BlockKind::Heading1),
            BlockType::Heading2 => TextBlock::deserialize(&payload).map(BlockKind::Heading2),
            BlockType::Heading3 => TextBlock::deserialize(&payload).map(BlockKind::Heading3),
            BlockType::BulletedListItem => {
                TextBlock::deserialize(&payload).map(BlockKind::BulletedListItem)
            }
            BlockType::NumberedListItem => {
                TextBlock::deserialize(&payload).map(BlockKind::NumberedListItem)
            }
            BlockType::Toggle => TextBlock::deserialize(&payload).map(BlockKind::Toggle),
            BlockType::Quote => TextBlock::deserialize(&payload).map(BlockKind::Quote),
            BlockType::Code => CodeBlock::deserialize(&payload).map(BlockKind::Code),
            BlockType::Equation => EquationBlock::deserialize(&payload).map(BlockKind::Equation),
            BlockType::Image => ImageBlock::deserialize(&payload).map(BlockKind::Image),
            BlockType::ToDo => ToDoBlock::deserialize(&payload).map(BlockKind::ToDo),
            BlockType::Divider => Ok(BlockKind::Divider),
            BlockType::Unsupported => Ok(BlockKind::Unsupported),
            // Group kinds are synthetic and never arrive from the store.
            BlockType::BulletedList | BlockType::NumberedList | BlockType::Unknown => {
                return unknown(self.type_name, payload);
            }
        };

        parsed.unwrap_or_else(|error| {
            tracing::warn!(
                target: TRACING_TARGET,
                block_id = %self.id,
                block_type = %self.type_name,
                error = %error,
                "Malformed block payload, keeping it as unknown"
            );
            unknown(self.type_name, payload)
        })
    }
}

fn unknown(name: String, payload: Value) -> BlockKind {
    BlockKind::Unknown(UnknownBlock { name, payload })
}

impl Block {
    /// Builds a typed block from a raw node and its already converted children.
    pub fn from_raw(raw: RawNode, children: Vec<Block>) -> Self {
        let id = raw.id.clone();
        let has_children = raw.has_children;
        Self {
            id,
            has_children,
            kind: raw.into_kind(),
            children,
        }
    }
}
