//! Error types for the Notion API client.

use folio_core::ErrorKind;
use thiserror::Error;

/// Result type alias for Notion API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Notion API operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Response body could not be decoded.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The configured base URL is not usable.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    /// The API answered with a non-success status.
    #[error("Notion API returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Classifies a non-success HTTP status.
pub(crate) fn status_kind(status: u16) -> ErrorKind {
    match status {
        400 | 422 => ErrorKind::InvalidInput,
        401 => ErrorKind::Authentication,
        403 => ErrorKind::Authorization,
        404 => ErrorKind::NotFound,
        408 | 504 => ErrorKind::Timeout,
        429 => ErrorKind::RateLimited,
        500..=599 => ErrorKind::ServiceUnavailable,
        _ => ErrorKind::ExternalError,
    }
}

impl From<Error> for folio_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    folio_core::Error::timeout()
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    folio_core::Error::network_error()
                        .with_message("Connection failed")
                        .with_source(e)
                } else {
                    folio_core::Error::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Serde(e) => folio_core::Error::invalid_response()
                .with_message(e.to_string())
                .with_source(e),
            Error::Url(e) => folio_core::Error::configuration()
                .with_message(e.to_string())
                .with_source(e),
            Error::Status { status, body } => folio_core::Error::new(status_kind(status))
                .with_message(format!("Notion API returned {status}: {body}")),
        }
    }
}
