//! In-memory document store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use folio_core::model::{Block, BlockKind, DocumentMeta, RawNode};
use folio_core::{Error, NodeId, Result};
use folio_notion::{ChildrenPage, DocumentPage, DocumentStore, Page, StoreService};
use serde_json::{Map, Value};

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: usize = 2;

/// Converts a typed block back into the shape the store delivers.
///
/// Children are not included; they are served by separate listings.
pub fn raw_node(block: &Block) -> RawNode {
    let (type_name, payload) = match &block.kind {
        BlockKind::Unknown(unknown) => (unknown.name.clone(), unknown.payload.clone()),
        kind => {
            let payload = match serde_json::to_value(kind) {
                Ok(Value::Object(mut tagged)) => {
                    tagged.remove("data").unwrap_or(Value::Object(Map::new()))
                }
                _ => Value::Object(Map::new()),
            };
            (block.block_type().as_ref().to_owned(), payload)
        }
    };

    RawNode::new(block.id.clone(), type_name, payload).with_has_children(!block.children.is_empty())
}

/// Mock document store for testing.
///
/// Clones share the fetch counter, so a test can keep a clone after handing
/// the store to a [`StoreService`].
#[derive(Debug, Clone)]
pub struct MockDocumentStore {
    page_size: usize,
    documents: Vec<DocumentMeta>,
    children: HashMap<NodeId, Vec<RawNode>>,
    failing: HashSet<NodeId>,
    delays: HashMap<NodeId, Duration>,
    fail_listing: bool,
    children_calls: Arc<AtomicUsize>,
}

impl Default for MockDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDocumentStore {
    /// Creates an empty store with the default page size.
    pub fn new() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            documents: Vec::new(),
            children: HashMap::new(),
            failing: HashSet::new(),
            delays: HashMap::new(),
            fail_listing: false,
            children_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sets the number of items per page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Adds a document with its content tree.
    pub fn with_document(mut self, meta: DocumentMeta, blocks: Vec<Block>) -> Self {
        self.insert_children(meta.id.clone(), &blocks);
        self.documents.push(meta);
        self
    }

    /// Makes every child listing of `node_id` fail.
    pub fn with_failure(mut self, node_id: impl Into<NodeId>) -> Self {
        self.failing.insert(node_id.into());
        self
    }

    /// Delays every child listing of `node_id`.
    pub fn with_delay(mut self, node_id: impl Into<NodeId>, delay: Duration) -> Self {
        self.delays.insert(node_id.into(), delay);
        self
    }

    /// Makes the document listing fail.
    pub fn with_failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// Returns how many child listings were requested so far.
    pub fn children_calls(&self) -> usize {
        self.children_calls.load(Ordering::SeqCst)
    }

    /// Wraps a clone of this store into a [`StoreService`].
    pub fn service(&self) -> StoreService {
        StoreService::new(self.clone())
    }

    fn insert_children(&mut self, parent: NodeId, blocks: &[Block]) {
        let nodes = blocks.iter().map(raw_node).collect();
        self.children.insert(parent, nodes);

        for block in blocks.iter().filter(|b| !b.children.is_empty()) {
            self.insert_children(block.id.clone(), &block.children);
        }
    }

    fn page<T: Clone>(&self, items: &[T], cursor: Option<&str>) -> Result<Page<T>> {
        let offset = match cursor {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| Error::invalid_input().with_message("unknown cursor"))?,
            None => 0,
        };

        let end = (offset + self.page_size).min(items.len());
        let slice = items.get(offset..end).unwrap_or_default().to_vec();

        if end < items.len() {
            Ok(Page::partial(slice, end.to_string()))
        } else {
            Ok(Page::last(slice))
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for MockDocumentStore {
    async fn list_children(&self, node_id: &NodeId, cursor: Option<&str>) -> Result<ChildrenPage> {
        self.children_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(node_id) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing.contains(node_id) {
            return Err(Error::network_error().with_message(format!("injected failure for {node_id}")));
        }

        match self.children.get(node_id) {
            Some(nodes) => self.page(nodes, cursor),
            None => Err(Error::not_found().with_message(format!("no node {node_id}"))),
        }
    }

    async fn query_documents(&self, cursor: Option<&str>) -> Result<DocumentPage> {
        if self.fail_listing {
            return Err(Error::network_error().with_message("injected listing failure"));
        }
        self.page(&self.documents, cursor)
    }
}

#[cfg(test)]
mod tests {
    use folio_core::model::{BlockType, TextBlock};

    use super::*;
    use crate::fixtures::{bullet, meta, paragraph, toggle};

    #[test]
    fn test_raw_node_round_trips_kind() {
        let block = toggle("t", "more", vec![paragraph("c", "child")]);

        let raw = raw_node(&block);
        assert_eq!(raw.type_name, "toggle");
        assert!(raw.has_children);
        assert_eq!(
            raw.into_kind(),
            BlockKind::Toggle(TextBlock::plain("more"))
        );
    }

    #[tokio::test]
    async fn test_children_are_paginated() {
        let store = MockDocumentStore::new().with_document(
            meta("doc", "Doc", 0),
            vec![bullet("a", "a"), bullet("b", "b"), bullet("c", "c")],
        );
        let service = store.service();

        let nodes = service.list_all_children(&NodeId::new("doc")).await.unwrap();

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[2].id.as_str(), "c");
        assert_eq!(store.children_calls(), 2);
        assert_eq!(
            nodes[0].clone().into_kind().block_type(),
            BlockType::BulletedListItem
        );
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store = MockDocumentStore::new()
            .with_document(meta("doc", "Doc", 0), vec![paragraph("p", "x")])
            .with_failure("doc");

        let error = store
            .list_children(&NodeId::new("doc"), None)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), folio_core::ErrorKind::NetworkError);
    }
}
