//! Complete block trees from paginated listings.

use std::sync::Arc;

use folio_core::model::{Block, RawNode};
use folio_core::{Error, ErrorKind, NodeId, Result};
use folio_notion::StoreService;
use futures::future::{BoxFuture, FutureExt, try_join_all};
use tokio::sync::Semaphore;

use super::TRACING_TARGET;

/// Fetches the full content tree below a node.
///
/// Sibling subtrees are fetched concurrently. A semaphore bounds the number
/// of child listings in flight; a permit is only held while one node's pages
/// are fetched, never across the descent into its children.
#[derive(Debug, Clone)]
pub struct TreeAssembler {
    store: StoreService,
    permits: Arc<Semaphore>,
}

impl TreeAssembler {
    /// Creates an assembler allowing `max_requests` concurrent listings.
    pub fn new(store: StoreService, max_requests: usize) -> Self {
        Self {
            store,
            permits: Arc::new(Semaphore::new(max_requests.max(1))),
        }
    }

    /// Returns the children of `root` with all of their descendants, in
    /// upstream order.
    ///
    /// # Errors
    ///
    /// Fails when any listing below `root` fails; no partial tree is
    /// returned.
    pub fn assemble<'a>(&'a self, root: &'a NodeId) -> BoxFuture<'a, Result<Vec<Block>>> {
        async move {
            let nodes = {
                let _permit = self.permits.acquire().await.map_err(|e| {
                    Error::new(ErrorKind::InternalError)
                        .with_message(format!("request limiter closed: {e}"))
                })?;
                self.store.list_all_children(root).await?
            };

            tracing::trace!(
                target: TRACING_TARGET,
                node_id = %root,
                children = nodes.len(),
                "Fetched children"
            );

            try_join_all(nodes.into_iter().map(|raw| self.assemble_node(raw))).await
        }
        .boxed()
    }

    async fn assemble_node(&self, raw: RawNode) -> Result<Block> {
        let children = if raw.has_children {
            self.assemble(&raw.id).await?
        } else {
            Vec::new()
        };

        Ok(Block::from_raw(raw, children))
    }
}
