//! Notion client configuration.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default base URL of the Notion REST API.
pub const DEFAULT_API_URL: &str = "https://api.notion.com/v1";

/// API version sent with every request.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Notion API client.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct NotionConfig {
    /// Integration token used as bearer credential
    #[cfg_attr(
        feature = "config",
        arg(long = "notion-secret", env = "NOTION_SECRET", hide_env_values = true)
    )]
    pub secret: String,

    /// Identifier of the database whose rows are built into pages
    #[cfg_attr(
        feature = "config",
        arg(long = "notion-database-id", env = "NOTION_DATABASE_ID")
    )]
    pub database_id: String,

    /// Base URL of the API
    #[cfg_attr(
        feature = "config",
        arg(long = "notion-api-url", env = "NOTION_API_URL", default_value = DEFAULT_API_URL)
    )]
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Value of the `Notion-Version` header
    #[cfg_attr(
        feature = "config",
        arg(long = "notion-version", env = "NOTION_VERSION", default_value = DEFAULT_NOTION_VERSION)
    )]
    #[serde(default = "default_notion_version")]
    pub notion_version: String,

    /// Per-request timeout in seconds, 0 for the default
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "HTTP_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// Title property of database rows
    #[cfg_attr(
        feature = "config",
        arg(long = "notion-title-property", env = "NOTION_TITLE_PROPERTY", default_value = "Name")
    )]
    #[serde(default = "default_title_property")]
    pub title_property: String,

    /// Rich text property holding the output file name
    #[cfg_attr(
        feature = "config",
        arg(
            long = "notion-filename-property",
            env = "NOTION_FILENAME_PROPERTY",
            default_value = "Filename"
        )
    )]
    #[serde(default = "default_filename_property")]
    pub filename_property: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_owned()
}

fn default_notion_version() -> String {
    DEFAULT_NOTION_VERSION.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_title_property() -> String {
    "Name".to_owned()
}

fn default_filename_property() -> String {
    "Filename".to_owned()
}

impl fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionConfig")
            .field("secret", &"<redacted>")
            .field("database_id", &self.database_id)
            .field("api_url", &self.api_url)
            .field("notion_version", &self.notion_version)
            .field("http_timeout", &self.http_timeout)
            .field("title_property", &self.title_property)
            .field("filename_property", &self.filename_property)
            .finish()
    }
}

impl NotionConfig {
    /// Creates a configuration with default endpoint settings.
    pub fn new(secret: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            database_id: database_id.into(),
            api_url: default_api_url(),
            notion_version: default_notion_version(),
            http_timeout: default_timeout_secs(),
            title_property: default_title_property(),
            filename_property: default_filename_property(),
        }
    }

    /// Returns the request timeout, treating 0 as unset.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the user agent sent with requests.
    pub fn user_agent(&self) -> String {
        format!("folio/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Set the title and filename property names.
    #[must_use]
    pub fn with_properties(
        mut self,
        title_property: impl Into<String>,
        filename_property: impl Into<String>,
    ) -> Self {
        self.title_property = title_property.into();
        self.filename_property = filename_property.into();
        self
    }
}
