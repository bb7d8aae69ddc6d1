//! The shared backlink graph.

use std::collections::BTreeMap;
use std::sync::Arc;

use folio_core::NodeId;
use tokio::sync::RwLock;

use crate::TRACING_TARGET;

type Edges = BTreeMap<NodeId, BTreeMap<NodeId, usize>>;

/// Directed references between documents, recorded while rendering.
///
/// Every occurrence of a reference is counted per (source, target) pair.
/// Writers from concurrently rendered documents only ever add to the graph.
/// Clones share the same graph.
#[derive(Debug, Clone, Default)]
pub struct BacklinkGraph {
    edges: Arc<RwLock<Edges>>,
}

impl BacklinkGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one reference from `source` to `target`.
    pub async fn record(&self, source: &NodeId, target: &NodeId) {
        self.record_all(source, std::slice::from_ref(target)).await;
    }

    /// Records every reference of one source document under a single lock.
    pub async fn record_all(&self, source: &NodeId, targets: &[NodeId]) {
        if targets.is_empty() {
            return;
        }

        let mut edges = self.edges.write().await;
        for target in targets {
            *edges
                .entry(target.clone())
                .or_default()
                .entry(source.clone())
                .or_default() += 1;
        }

        tracing::trace!(
            target: TRACING_TARGET,
            source = %source,
            references = targets.len(),
            "Recorded references"
        );
    }

    /// Returns the number of recorded occurrences.
    pub async fn occurrence_count(&self) -> usize {
        let edges = self.edges.read().await;
        edges.values().flat_map(BTreeMap::values).sum()
    }

    /// Copies the current graph into an immutable view.
    pub async fn snapshot(&self) -> Backlinks {
        Backlinks {
            edges: self.edges.read().await.clone(),
        }
    }
}

/// Immutable view of a [`BacklinkGraph`], read when writing pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backlinks {
    edges: Edges,
}

impl Backlinks {
    /// Returns the distinct documents referencing `target`, in id order.
    pub fn sources(&self, target: &NodeId) -> impl Iterator<Item = &NodeId> {
        self.edges.get(target).into_iter().flat_map(BTreeMap::keys)
    }

    /// Returns how many times `source` references `target`.
    pub fn occurrences(&self, source: &NodeId, target: &NodeId) -> usize {
        self.edges
            .get(target)
            .and_then(|sources| sources.get(source))
            .copied()
            .unwrap_or(0)
    }

    /// Returns whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
