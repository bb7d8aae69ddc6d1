//! Reqwest-based client for the Notion REST API.
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_notion::reqwest::{NotionClient, NotionConfig};
//! use folio_notion::StoreService;
//!
//! let config = NotionConfig::new("secret_...", "database-id");
//! let store: StoreService = NotionClient::new(config)?.into_service();
//! let documents = store.list_all_documents().await?;
//! ```

mod client;
mod config;
mod error;
mod properties;

pub use client::NotionClient;
pub use config::NotionConfig;
pub use error::{Error, Result};

/// Tracing target for Notion API requests.
pub const TRACING_TARGET: &str = "folio_notion::reqwest";
