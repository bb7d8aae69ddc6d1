//! Rebuild-or-reuse decisions.

use folio_core::model::{Document, DocumentMeta};
use jiff::Timestamp;
use strum::{AsRefStr, Display};

use crate::TRACING_TARGET;
use crate::error::{CacheError, CacheResult};
use crate::snapshot::Snapshot;
use crate::store::SnapshotStore;

/// Why a document has to be rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RebuildReason {
    /// Caching is disabled for this build.
    Disabled,
    /// No snapshot is stored.
    Missing,
    /// The document changed upstream after the snapshot was taken.
    Stale,
    /// The snapshot could not be decoded.
    Corrupt,
    /// The snapshot was written in another format version.
    Incompatible,
    /// The snapshot could not be read from storage.
    Unreadable,
}

/// Outcome of [`CacheGate::decide`].
#[derive(Debug, Clone, PartialEq)]
pub enum CacheDecision {
    /// Use the stored tree without fetching.
    Reuse(Snapshot),
    /// Fetch and group the document again.
    Rebuild(RebuildReason),
}

/// Returns whether a snapshot taken at `snapshot` may stand in for a
/// document last modified upstream at `upstream`.
pub fn is_fresh(snapshot: Timestamp, upstream: Timestamp, disabled: bool) -> bool {
    !disabled && snapshot >= upstream
}

/// Per-document incremental cache gate.
#[derive(Debug, Clone)]
pub struct CacheGate {
    store: SnapshotStore,
    disabled: bool,
}

impl CacheGate {
    /// Creates a gate over `store`. With `disabled` set every document is
    /// rebuilt, though snapshots are still written.
    pub fn new(store: SnapshotStore, disabled: bool) -> Self {
        Self { store, disabled }
    }

    /// Returns whether reads are disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Decides whether the document described by `meta` can be reused.
    ///
    /// Never fails: any problem with the stored snapshot becomes a rebuild.
    pub async fn decide(&self, meta: &DocumentMeta) -> CacheDecision {
        if self.disabled {
            return CacheDecision::Rebuild(RebuildReason::Disabled);
        }

        let snapshot = match self.store.get(&meta.id).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return CacheDecision::Rebuild(RebuildReason::Missing),
            Err(error) => {
                let reason = match error {
                    CacheError::Corrupt { .. } => RebuildReason::Corrupt,
                    CacheError::Incompatible { .. } => RebuildReason::Incompatible,
                    _ => RebuildReason::Unreadable,
                };
                tracing::warn!(
                    target: TRACING_TARGET,
                    doc_id = %meta.id,
                    error = %error,
                    reason = %reason,
                    "Ignoring unusable snapshot"
                );
                return CacheDecision::Rebuild(reason);
            }
        };

        if is_fresh(snapshot.last_modified(), meta.last_modified, self.disabled) {
            tracing::debug!(
                target: TRACING_TARGET,
                doc_id = %meta.id,
                snapshot_at = %snapshot.last_modified(),
                "Snapshot is fresh"
            );
            CacheDecision::Reuse(snapshot)
        } else {
            tracing::debug!(
                target: TRACING_TARGET,
                doc_id = %meta.id,
                snapshot_at = %snapshot.last_modified(),
                upstream_at = %meta.last_modified,
                "Snapshot is stale"
            );
            CacheDecision::Rebuild(RebuildReason::Stale)
        }
    }

    /// Stores the grouped tree of a freshly built document.
    pub async fn persist(&self, document: &Document) -> CacheResult<()> {
        self.store.put(&Snapshot::new(document.clone())).await
    }
}

#[cfg(test)]
mod tests {
    use folio_core::NodeId;
    use folio_core::model::{Block, BlockKind, TextBlock};
    use jiff::ToSpan;

    use super::*;

    const ID: &str = "c3d85220-62aa-457a-b414-90c5e9929790";

    fn at(seconds: i64) -> Timestamp {
        Timestamp::from_second(seconds).unwrap()
    }

    fn document(modified: Timestamp) -> Document {
        Document::new(
            DocumentMeta::new(ID, "Title", modified),
            vec![Block::new("b", BlockKind::Paragraph(TextBlock::plain("x")))],
        )
    }

    #[test]
    fn test_is_fresh() {
        let t = at(1_700_000_000);
        let later = t.checked_add(1.second()).unwrap();

        assert!(is_fresh(t, t, false));
        assert!(is_fresh(later, t, false));
        assert!(!is_fresh(t, later, false));
        assert!(!is_fresh(later, t, true));
    }

    #[tokio::test]
    async fn test_reuse_when_fresh() {
        let gate = CacheGate::new(SnapshotStore::memory().unwrap(), false);
        let doc = document(at(100));
        gate.persist(&doc).await.unwrap();

        let decision = gate.decide(&doc.meta).await;
        assert_eq!(decision, CacheDecision::Reuse(Snapshot::new(doc)));
    }

    #[tokio::test]
    async fn test_rebuild_when_stale() {
        let gate = CacheGate::new(SnapshotStore::memory().unwrap(), false);
        gate.persist(&document(at(100))).await.unwrap();

        let upstream = DocumentMeta::new(ID, "Title", at(200));
        assert_eq!(
            gate.decide(&upstream).await,
            CacheDecision::Rebuild(RebuildReason::Stale)
        );
    }

    #[tokio::test]
    async fn test_rebuild_when_missing() {
        let gate = CacheGate::new(SnapshotStore::memory().unwrap(), false);
        let meta = DocumentMeta::new(ID, "Title", at(100));
        assert_eq!(
            gate.decide(&meta).await,
            CacheDecision::Rebuild(RebuildReason::Missing)
        );
    }

    #[tokio::test]
    async fn test_disabled_always_rebuilds_but_still_persists() {
        let store = SnapshotStore::memory().unwrap();
        let gate = CacheGate::new(store.clone(), true);
        let doc = document(at(100));

        gate.persist(&doc).await.unwrap();
        assert!(store.get(&NodeId::new(ID)).await.unwrap().is_some());
        assert_eq!(
            gate.decide(&doc.meta).await,
            CacheDecision::Rebuild(RebuildReason::Disabled)
        );
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_a_miss() {
        let store = SnapshotStore::memory().unwrap();
        store.put_raw(&NodeId::new(ID), b"garbage").await.unwrap();
        let gate = CacheGate::new(store, false);

        let meta = DocumentMeta::new(ID, "Title", at(100));
        assert_eq!(
            gate.decide(&meta).await,
            CacheDecision::Rebuild(RebuildReason::Corrupt)
        );
    }
}
