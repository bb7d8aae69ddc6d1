//! Build error types.

use std::io;
use std::path::PathBuf;

use folio_core::NodeId;
use thiserror::Error;

/// Result type for build operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors that can occur during a build.
///
/// `Configuration`, `Seed` and `Listing` abort a build, as does `Output` when
/// the output directory itself cannot be created. Everything else is
/// confined to one document and ends up in the [`BuildReport`].
///
/// [`BuildReport`]: crate::engine::BuildReport
#[derive(Debug, Error)]
pub enum BuildError {
    /// Build configuration is invalid.
    #[error("invalid build configuration: {0}")]
    Configuration(String),

    /// No usable build seed.
    #[error("build seed unavailable: {0}")]
    Seed(String),

    /// The document listing failed, nothing can be built.
    #[error("failed to list documents: {0}")]
    Listing(#[source] folio_core::Error),

    /// Fetching a document's content failed.
    #[error("document {doc_id} failed: {source}")]
    Document {
        /// ID of the failed document.
        doc_id: NodeId,
        /// Underlying store error.
        #[source]
        source: folio_core::Error,
    },

    /// Writing an output file failed.
    #[error("failed to write {}: {source}", path.display())]
    Output {
        /// Path of the output file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An output name would escape the output directory.
    #[error("unsafe output name: {0:?}")]
    UnsafeOutputName(String),

    /// A document went missing between build phases.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BuildError {
    /// Returns whether the document store failed transiently, so running the
    /// build again may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Listing(source) | Self::Document { source, .. } => {
                source.kind().is_upstream() && source.is_retryable()
            }
            _ => false,
        }
    }
}

impl From<BuildError> for folio_core::Error {
    fn from(error: BuildError) -> Self {
        use folio_core::ErrorKind;

        let kind = match &error {
            BuildError::Configuration(_) | BuildError::Seed(_) => ErrorKind::Configuration,
            BuildError::Listing(inner) | BuildError::Document { source: inner, .. } => inner.kind(),
            BuildError::UnsafeOutputName(_) => ErrorKind::InvalidInput,
            BuildError::Output { .. } | BuildError::Internal(_) => ErrorKind::InternalError,
        };

        folio_core::Error::from_source(kind, error)
    }
}
