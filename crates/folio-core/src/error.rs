//! The error type shared by every folio crate.
//!
//! Crate-local error enums (`CacheError`, the Notion client errors,
//! `BuildError`) convert into [`Error`] at their public boundaries, keeping
//! the original as the source.

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Boxed error usable as a source across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias defaulting to [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// What went wrong, independent of which crate noticed.
///
/// The first group describes failures of the document store, see
/// [`ErrorKind::is_upstream`]; the rest are local.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The store answered with something that cannot be interpreted.
    InvalidResponse,
    /// The request failed below HTTP.
    NetworkError,
    /// The store rejected the credentials.
    Authentication,
    /// The credentials lack access to the resource.
    Authorization,
    /// The store asked us to slow down.
    RateLimited,
    /// The store is temporarily down.
    ServiceUnavailable,
    /// The node or database does not exist.
    NotFound,
    /// The request took too long.
    Timeout,
    /// Any other rejection by the store.
    ExternalError,

    /// A caller passed an unusable argument.
    InvalidInput,
    /// Settings are missing or inconsistent.
    Configuration,
    /// Encoding or decoding failed.
    Serialization,
    /// Unexpected local failure.
    InternalError,
    /// Unclassified.
    #[default]
    Unknown,
}

impl ErrorKind {
    /// Returns whether repeating the same request may succeed.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::Timeout | Self::ServiceUnavailable | Self::RateLimited
        )
    }

    /// Returns whether the document store caused the failure.
    #[must_use]
    pub const fn is_upstream(self) -> bool {
        matches!(
            self,
            Self::InvalidResponse
                | Self::NetworkError
                | Self::Authentication
                | Self::Authorization
                | Self::RateLimited
                | Self::ServiceUnavailable
                | Self::NotFound
                | Self::Timeout
                | Self::ExternalError
        )
    }
}

/// A classified error with optional detail and cause.
#[must_use]
#[derive(Debug, Error)]
#[error("[{kind}]{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    pub kind: ErrorKind,
    /// Human-readable detail.
    pub message: Option<String>,
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates an error of `kind` without detail.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Creates an error of `kind` caused by `source`.
    pub fn from_source(kind: ErrorKind, source: impl Into<BoxedError>) -> Self {
        Self::new(kind).with_source(source)
    }

    /// Attaches a message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches the underlying cause.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    pub fn invalid_response() -> Self {
        Self::new(ErrorKind::InvalidResponse)
    }

    pub fn network_error() -> Self {
        Self::new(ErrorKind::NetworkError)
    }

    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns whether repeating the failed operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::from_source(ErrorKind::Serialization, error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::from_source(ErrorKind::InternalError, error)
    }
}
