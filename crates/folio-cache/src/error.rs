//! Cache error types.

use folio_core::NodeId;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur while reading or writing snapshots.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Failed to initialize the storage operator.
    #[error("cache initialization failed: {0}")]
    Init(String),

    /// A stored snapshot could not be decoded.
    #[error("snapshot for {id} is corrupt: {source}")]
    Corrupt {
        id: NodeId,
        source: serde_json::Error,
    },

    /// A stored snapshot was written by an incompatible version.
    #[error("snapshot for {id} has version {found}, expected {expected}")]
    Incompatible { id: NodeId, found: u32, expected: u32 },

    /// A snapshot could not be encoded.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] opendal::Error),
}

impl CacheError {
    /// Creates a new initialization error.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }
}

impl From<CacheError> for folio_core::Error {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Init(msg) => folio_core::Error::configuration().with_message(msg),
            CacheError::Corrupt { .. } | CacheError::Incompatible { .. } => {
                folio_core::Error::serialization()
                    .with_message(err.to_string())
                    .with_source(err)
            }
            CacheError::Encode(e) => folio_core::Error::serialization()
                .with_message("failed to encode snapshot")
                .with_source(e),
            CacheError::Storage(e) => folio_core::Error::from_source(
                folio_core::ErrorKind::InternalError,
                e,
            )
            .with_message("snapshot storage failed"),
        }
    }
}
