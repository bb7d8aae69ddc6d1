//! Reqwest-based Notion API client.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::properties::RawPage;
use super::{Error, NotionConfig, TRACING_TARGET};
use crate::{ChildrenPage, DocumentPage, DocumentStore, NodeId, Page, StoreService};

/// Largest page size the API accepts.
const PAGE_SIZE: u32 = 100;

/// Inner client that holds the HTTP client and configuration.
struct NotionClientInner {
    http: Client,
    config: NotionConfig,
}

/// Reqwest-based client for the Notion REST API.
///
/// Implements [`DocumentStore`] over the block children and database query
/// endpoints.
#[derive(Clone)]
pub struct NotionClient {
    inner: Arc<NotionClientInner>,
}

impl std::fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<&'a str>,
}

impl NotionClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the secret or database id is missing,
    /// the base URL is invalid, or the HTTP client cannot be built.
    pub fn new(config: NotionConfig) -> folio_core::Result<Self> {
        if config.secret.trim().is_empty() {
            return Err(folio_core::Error::configuration().with_message("Notion secret is not set"));
        }
        if config.database_id.trim().is_empty() {
            return Err(
                folio_core::Error::configuration().with_message("Notion database id is not set")
            );
        }
        Url::parse(&config.api_url).map_err(Error::from)?;

        let timeout = config.effective_timeout();
        tracing::debug!(
            target: TRACING_TARGET,
            api_url = %config.api_url,
            timeout_ms = timeout.as_millis(),
            "Creating Notion client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| {
                folio_core::Error::configuration()
                    .with_message("failed to create HTTP client")
                    .with_source(e)
            })?;

        Ok(Self {
            inner: Arc::new(NotionClientInner { http, config }),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &NotionConfig {
        &self.inner.config
    }

    /// Converts this client into a [`StoreService`] for use with dependency injection.
    pub fn into_service(self) -> StoreService {
        StoreService::new(self)
    }

    /// Builds the URL of an API path relative to the configured base.
    pub(crate) fn endpoint(&self, path: &str) -> folio_core::Result<Url> {
        let base = self.config().api_url.trim_end_matches('/');
        let url = Url::parse(&format!("{base}/{path}")).map_err(Error::from)?;
        Ok(url)
    }

    /// Sends an authenticated request and decodes a JSON response.
    async fn send<T>(&self, request: RequestBuilder) -> folio_core::Result<T>
    where
        T: DeserializeOwned,
    {
        let config = self.config();
        let response = request
            .bearer_auth(&config.secret)
            .header("Notion-Version", &config.notion_version)
            .send()
            .await
            .map_err(Error::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                "Notion API request failed"
            );
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let bytes = response.bytes().await.map_err(Error::from)?;
        let decoded = serde_json::from_slice(&bytes).map_err(Error::from)?;
        Ok(decoded)
    }
}

#[async_trait::async_trait]
impl DocumentStore for NotionClient {
    async fn list_children(
        &self,
        node_id: &NodeId,
        cursor: Option<&str>,
    ) -> folio_core::Result<ChildrenPage> {
        let mut url = self.endpoint(&format!("blocks/{node_id}/children"))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page_size", &PAGE_SIZE.to_string());
            if let Some(cursor) = cursor {
                query.append_pair("start_cursor", cursor);
            }
        }

        tracing::trace!(
            target: TRACING_TARGET,
            node_id = %node_id,
            cursor = ?cursor,
            "Fetching block children"
        );

        self.send(self.inner.http.get(url)).await
    }

    async fn query_documents(&self, cursor: Option<&str>) -> folio_core::Result<DocumentPage> {
        let config = self.config();
        let url = self.endpoint(&format!("databases/{}/query", config.database_id))?;
        let body = QueryBody {
            page_size: PAGE_SIZE,
            start_cursor: cursor,
        };

        tracing::debug!(
            target: TRACING_TARGET,
            database_id = %config.database_id,
            cursor = ?cursor,
            "Querying database"
        );

        let page: Page<RawPage> = self.send(self.inner.http.post(url).json(&body)).await?;
        Ok(page.map(|row| row.into_meta(&config.title_property, &config.filename_property)))
    }
}

#[cfg(test)]
mod tests {
    use folio_core::ErrorKind;

    use super::*;

    #[test]
    fn test_client_creation() {
        let client = NotionClient::new(NotionConfig::new("secret_abc", "db")).unwrap();
        assert_eq!(client.config().database_id, "db");
        assert!(!format!("{client:?}").contains("secret_abc"));
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let error = NotionClient::new(NotionConfig::new("", "db")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = NotionConfig::new("s", "db").with_api_url("not a url");
        let error = NotionClient::new(config).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_endpoint_keeps_version_prefix() {
        let config = NotionConfig::new("s", "db").with_api_url("https://api.notion.com/v1/");
        let client = NotionClient::new(config).unwrap();

        let url = client.endpoint("blocks/abc/children").unwrap();
        assert_eq!(url.as_str(), "https://api.notion.com/v1/blocks/abc/children");
    }

    #[test]
    fn test_query_body_omits_missing_cursor() {
        let body = QueryBody {
            page_size: PAGE_SIZE,
            start_cursor: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "page_size": 100 })
        );
    }
}
