#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod page;
mod service;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

pub use folio_core::{Error, ErrorKind, NodeId, Result};
pub use page::{ChildrenPage, DocumentPage, Page};
pub use service::StoreService;

/// Tracing target for document store operations.
pub const TRACING_TARGET: &str = "folio_notion::store";

/// Paginated access to a hierarchical document store.
///
/// Implementations return one page per call; callers keep passing
/// [`Page::next_cursor`] back until [`Page::has_more`] is false.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists one page of the direct children of `node_id`.
    async fn list_children(&self, node_id: &NodeId, cursor: Option<&str>)
    -> Result<ChildrenPage>;

    /// Lists one page of the documents to build.
    async fn query_documents(&self, cursor: Option<&str>) -> Result<DocumentPage>;
}

#[async_trait::async_trait]
impl<T> DocumentStore for std::sync::Arc<T>
where
    T: DocumentStore + ?Sized,
{
    async fn list_children(
        &self,
        node_id: &NodeId,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage> {
        (**self).list_children(node_id, cursor).await
    }

    async fn query_documents(&self, cursor: Option<&str>) -> Result<DocumentPage> {
        (**self).query_documents(cursor).await
    }
}
