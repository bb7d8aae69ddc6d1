//! Snapshot storage on top of OpenDAL.

use std::path::Path;

use folio_core::NodeId;
use opendal::{ErrorKind, Operator, services};

use crate::TRACING_TARGET;
use crate::error::{CacheError, CacheResult};
use crate::snapshot::{SNAPSHOT_VERSION, Snapshot, SnapshotHeader};

/// Directory, relative to the cache root, for in-flight writes.
const ATOMIC_WRITE_DIR: &str = ".tmp";

/// Keyed snapshot storage.
///
/// Writes replace the previous snapshot atomically: a reader sees either the
/// old or the new snapshot, never a partial one.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    operator: Operator,
}

impl SnapshotStore {
    /// Creates a store rooted at a local directory.
    pub fn fs(root: impl AsRef<Path>) -> CacheResult<Self> {
        let root = root.as_ref();
        let atomic_dir = root.join(ATOMIC_WRITE_DIR);

        let builder = services::Fs::default()
            .root(&root.to_string_lossy())
            .atomic_write_dir(&atomic_dir.to_string_lossy());

        let operator = Operator::new(builder)
            .map(|op| op.finish())
            .map_err(|e| CacheError::init(e.to_string()))?;

        tracing::info!(
            target: TRACING_TARGET,
            root = %root.display(),
            "Snapshot store initialized"
        );

        Ok(Self { operator })
    }

    /// Creates a store that lives in memory.
    pub fn memory() -> CacheResult<Self> {
        let operator = Operator::new(services::Memory::default())
            .map(|op| op.finish())
            .map_err(|e| CacheError::init(e.to_string()))?;

        Ok(Self { operator })
    }

    fn key(id: &NodeId) -> String {
        format!("{}.json", id.compact())
    }

    /// Reads the snapshot of a document, if one is stored.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Corrupt`] or [`CacheError::Incompatible`] when a
    /// snapshot exists but cannot be used, and [`CacheError::Storage`] when
    /// reading fails.
    pub async fn get(&self, id: &NodeId) -> CacheResult<Option<Snapshot>> {
        let key = Self::key(id);

        let data = match self.operator.read(&key).await {
            Ok(buffer) => buffer.to_vec(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(target: TRACING_TARGET, doc_id = %id, "No snapshot stored");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let header: SnapshotHeader =
            serde_json::from_slice(&data).map_err(|source| CacheError::Corrupt {
                id: id.clone(),
                source,
            })?;
        if header.version != SNAPSHOT_VERSION {
            return Err(CacheError::Incompatible {
                id: id.clone(),
                found: header.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let snapshot: Snapshot =
            serde_json::from_slice(&data).map_err(|source| CacheError::Corrupt {
                id: id.clone(),
                source,
            })?;

        tracing::debug!(
            target: TRACING_TARGET,
            doc_id = %id,
            size = data.len(),
            "Snapshot read"
        );

        Ok(Some(snapshot))
    }

    /// Stores a snapshot, replacing any previous one for the same document.
    pub async fn put(&self, snapshot: &Snapshot) -> CacheResult<()> {
        let key = Self::key(snapshot.id());
        let data = serde_json::to_vec(snapshot).map_err(CacheError::Encode)?;
        let size = data.len();

        self.operator.write(&key, data).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            doc_id = %snapshot.id(),
            size,
            "Snapshot written"
        );

        Ok(())
    }

    #[cfg(test)]
    pub(crate) async fn put_raw(&self, id: &NodeId, data: &[u8]) -> CacheResult<()> {
        self.operator.write(&Self::key(id), data.to_vec()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use folio_core::model::{Block, BlockKind, Document, DocumentMeta, TextBlock};
    use jiff::Timestamp;

    use super::*;

    fn document(id: &str) -> Document {
        let meta = DocumentMeta::new(id, "Title", Timestamp::UNIX_EPOCH);
        let blocks = vec![Block::new(
            "b1",
            BlockKind::Paragraph(TextBlock::plain("hello")),
        )];
        Document::new(meta, blocks)
    }

    const ID: &str = "c3d85220-62aa-457a-b414-90c5e9929790";

    #[tokio::test]
    async fn test_fs_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::fs(dir.path()).unwrap();
        let snapshot = Snapshot::new(document(ID));

        store.put(&snapshot).await.unwrap();

        assert!(dir.path().join("c3d8522062aa457ab41490c5e9929790.json").exists());
        let read = store.get(&NodeId::new(ID)).await.unwrap();
        assert_eq!(read, Some(snapshot));
    }

    #[tokio::test]
    async fn test_put_replaces_previous_snapshot() {
        let store = SnapshotStore::memory().unwrap();
        let first = Snapshot::new(document(ID));
        let mut second = first.clone();
        second.document.meta.title = "Changed".to_owned();

        store.put(&first).await.unwrap();
        store.put(&second).await.unwrap();

        let read = store.get(&NodeId::new(ID)).await.unwrap().unwrap();
        assert_eq!(read.document.meta.title, "Changed");
    }

    #[tokio::test]
    async fn test_missing_snapshot() {
        let store = SnapshotStore::memory().unwrap();
        assert!(store.get(&NodeId::new(ID)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot() {
        let store = SnapshotStore::memory().unwrap();
        let id = NodeId::new(ID);
        store.put_raw(&id, b"{ not json").await.unwrap();

        let error = store.get(&id).await.unwrap_err();
        assert!(matches!(error, CacheError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_incompatible_snapshot() {
        let store = SnapshotStore::memory().unwrap();
        let id = NodeId::new(ID);
        store
            .put_raw(&id, br#"{ "version": 999, "document": null }"#)
            .await
            .unwrap();

        let error = store.get(&id).await.unwrap_err();
        assert!(matches!(
            error,
            CacheError::Incompatible { found: 999, .. }
        ));
    }
}
