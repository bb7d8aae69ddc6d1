//! Document store service wrapper with observability.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use folio_core::model::{DocumentMeta, RawNode};

use crate::{ChildrenPage, DocumentPage, DocumentStore, Error, NodeId, Result, TRACING_TARGET};

/// Document store wrapper with observability.
///
/// Adds structured logging and pagination helpers to any [`DocumentStore`].
/// The inner store is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct StoreService {
    inner: Arc<dyn DocumentStore>,
}

impl fmt::Debug for StoreService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreService").finish_non_exhaustive()
    }
}

impl StoreService {
    /// Create a new store service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: DocumentStore + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Lists one page of the children of `node_id`.
    pub async fn list_children(
        &self,
        node_id: &NodeId,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage> {
        let started_at = Instant::now();
        let result = self.inner.list_children(node_id, cursor).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(page) => {
                tracing::trace!(
                    target: TRACING_TARGET,
                    node_id = %node_id,
                    items = page.items.len(),
                    has_more = page.has_more,
                    elapsed_ms = elapsed.as_millis(),
                    "Listed children"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    node_id = %node_id,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Failed to list children"
                );
            }
        }

        result
    }

    /// Lists one page of documents.
    pub async fn query_documents(&self, cursor: Option<&str>) -> Result<DocumentPage> {
        let started_at = Instant::now();
        let result = self.inner.query_documents(cursor).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(page) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    items = page.items.len(),
                    has_more = page.has_more,
                    elapsed_ms = elapsed.as_millis(),
                    "Queried documents"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Failed to query documents"
                );
            }
        }

        result
    }

    /// Lists every child of `node_id`, following pagination to the end.
    pub async fn list_all_children(&self, node_id: &NodeId) -> Result<Vec<RawNode>> {
        let mut nodes = Vec::new();
        let mut cursor = Cursor::default();

        loop {
            let page = self.list_children(node_id, cursor.current()).await?;
            let (items, next) = page.into_parts()?;
            nodes.extend(items);

            if !cursor.advance(next)? {
                break;
            }
        }

        Ok(nodes)
    }

    /// Lists every document, following pagination to the end.
    pub async fn list_all_documents(&self) -> Result<Vec<DocumentMeta>> {
        let mut documents = Vec::new();
        let mut cursor = Cursor::default();

        loop {
            let page = self.query_documents(cursor.current()).await?;
            let (items, next) = page.into_parts()?;
            documents.extend(items);

            if !cursor.advance(next)? {
                break;
            }
        }

        tracing::info!(
            target: TRACING_TARGET,
            documents = documents.len(),
            "Listed all documents"
        );

        Ok(documents)
    }
}

/// Pagination position that refuses to revisit a cursor.
#[derive(Debug, Default)]
struct Cursor {
    current: Option<String>,
    seen: HashSet<String>,
}

impl Cursor {
    fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Moves to `next`, returning `false` once the listing is exhausted.
    fn advance(&mut self, next: Option<String>) -> Result<bool> {
        let Some(next) = next else {
            return Ok(false);
        };

        if !self.seen.insert(next.clone()) {
            return Err(Error::invalid_response()
                .with_message(format!("store returned cursor {next:?} twice")));
        }

        self.current = Some(next);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use folio_core::ErrorKind;
    use jiff::Timestamp;
    use serde_json::json;

    use super::*;
    use crate::Page;

    /// Serves fixed pages keyed by cursor.
    struct PagedStore {
        children: Vec<ChildrenPage>,
        documents: Vec<DocumentPage>,
    }

    fn page_index(cursor: Option<&str>) -> usize {
        cursor.and_then(|c| c.parse().ok()).unwrap_or(0)
    }

    #[async_trait::async_trait]
    impl DocumentStore for PagedStore {
        async fn list_children(
            &self,
            _node_id: &NodeId,
            cursor: Option<&str>,
        ) -> Result<ChildrenPage> {
            Ok(self.children[page_index(cursor)].clone())
        }

        async fn query_documents(&self, cursor: Option<&str>) -> Result<DocumentPage> {
            Ok(self.documents[page_index(cursor)].clone())
        }
    }

    fn node(id: &str) -> RawNode {
        RawNode::new(id, "divider", json!({}))
    }

    fn meta(id: &str) -> DocumentMeta {
        DocumentMeta::new(id, id, Timestamp::UNIX_EPOCH)
    }

    #[tokio::test]
    async fn test_list_all_children_follows_cursors() {
        let service = StoreService::new(PagedStore {
            children: vec![
                Page::partial(vec![node("a"), node("b")], "1"),
                Page::partial(vec![node("c")], "2"),
                Page::last(vec![node("d")]),
            ],
            documents: Vec::new(),
        });

        let nodes = service.list_all_children(&NodeId::new("root")).await.unwrap();
        let ids: Vec<_> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_list_all_documents_follows_cursors() {
        let service = StoreService::new(PagedStore {
            children: Vec::new(),
            documents: vec![
                Page::partial(vec![meta("x")], "1"),
                Page::last(vec![meta("y")]),
            ],
        });

        let documents = service.list_all_documents().await.unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[1].id.as_str(), "y");
    }

    #[tokio::test]
    async fn test_repeated_cursor_fails() {
        let service = StoreService::new(PagedStore {
            children: vec![Page::partial(vec![node("a")], "0")],
            documents: vec![
                Page::partial(vec![meta("x")], "1"),
                Page::partial(vec![meta("y")], "0"),
            ],
        });

        let error = service
            .list_all_children(&NodeId::new("root"))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidResponse);

        let error = service.list_all_documents().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidResponse);
    }

    #[tokio::test]
    async fn test_missing_cursor_fails() {
        let service = StoreService::new(PagedStore {
            children: vec![Page {
                items: vec![node("a")],
                has_more: true,
                next_cursor: None,
            }],
            documents: Vec::new(),
        });

        let error = service
            .list_all_children(&NodeId::new("root"))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidResponse);
    }
}
