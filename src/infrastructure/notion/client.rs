//! Notion HTTP API client with rate limiting.
//!
//! Implements [`NotionApi`] over the Notion REST API. Each method performs a
//! single request; HTTP status codes and transport failures are classified
//! into [`NotionApiError`] variants so the retry policy can tell transient
//! failures from permanent ones.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::errors::NotionApiError;
use crate::domain::models::{
    CreatePageRequest, DatabaseQuery, NotionConfig, PageResponse, QueryResponse,
    UpdatePageRequest,
};
use crate::domain::ports::NotionApi;

/// Configuration for the Notion HTTP client
#[derive(Debug, Clone)]
pub struct NotionClientConfig {
    /// Internal integration token
    pub token: String,

    /// Base URL for the Notion API
    pub base_url: String,

    /// `Notion-Version` header value
    pub api_version: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Client-side rate limit
    pub requests_per_second: u32,
}

impl NotionClientConfig {
    pub fn from_config(token: String, config: &NotionConfig) -> Self {
        Self {
            token,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            timeout_secs: config.timeout_secs,
            requests_per_second: config.requests_per_second,
        }
    }
}

/// HTTP client for the Notion REST API.
pub struct NotionHttpClient {
    /// Reusable HTTP client with connection pooling
    http: ReqwestClient,
    token: String,
    base_url: String,
    api_version: String,
    rate_limiter: DefaultDirectRateLimiter,
}

impl std::fmt::Debug for NotionHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionHttpClient")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl NotionHttpClient {
    pub fn with_config(config: NotionClientConfig) -> Result<Self> {
        let http = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("notion-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http,
            token: config.token,
            base_url: config.base_url,
            api_version: config.api_version,
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.api_version)
    }

    /// Wait for a rate-limit slot, send, and decode a successful response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, NotionApiError> {
        self.rate_limiter.until_ready().await;

        let response = request.send().await.map_err(classify_transport_error)?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            warn!(status = status.as_u16(), body = %body, "Notion API returned an error");
            return Err(NotionApiError::from_status(status.as_u16(), body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| NotionApiError::Decode(e.to_string()))
    }
}

fn classify_transport_error(err: reqwest::Error) -> NotionApiError {
    if err.is_timeout() {
        NotionApiError::Timeout
    } else if err.is_decode() {
        NotionApiError::Decode(err.to_string())
    } else {
        NotionApiError::Network(err.to_string())
    }
}

#[async_trait]
impl NotionApi for NotionHttpClient {
    async fn create_page(&self, request: &CreatePageRequest) -> Result<PageResponse, NotionApiError> {
        debug!(database_id = %request.parent.database_id, "POST /v1/pages");
        self.send(self.request(Method::POST, "/v1/pages").json(request))
            .await
    }

    async fn update_page(
        &self,
        page_id: &str,
        request: &UpdatePageRequest,
    ) -> Result<PageResponse, NotionApiError> {
        debug!(page_id, "PATCH /v1/pages/{{id}}");
        self.send(
            self.request(Method::PATCH, &format!("/v1/pages/{page_id}"))
                .json(request),
        )
        .await
    }

    async fn retrieve_page(&self, page_id: &str) -> Result<PageResponse, NotionApiError> {
        debug!(page_id, "GET /v1/pages/{{id}}");
        self.send(self.request(Method::GET, &format!("/v1/pages/{page_id}")))
            .await
    }

    async fn query_database(
        &self,
        database_id: &str,
        query: &DatabaseQuery,
    ) -> Result<QueryResponse, NotionApiError> {
        debug!(database_id, "POST /v1/databases/{{id}}/query");
        self.send(
            self.request(Method::POST, &format!("/v1/databases/{database_id}/query"))
                .json(query),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_notion_config_trims_trailing_slash() {
        let notion = NotionConfig {
            api_base_url: "https://api.notion.com/".to_string(),
            ..NotionConfig::default()
        };
        let config = NotionClientConfig::from_config("secret_token".to_string(), &notion);
        assert_eq!(config.base_url, "https://api.notion.com");
        assert_eq!(config.api_version, "2022-06-28");
        assert_eq!(config.requests_per_second, 3);
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let client = NotionHttpClient::with_config(NotionClientConfig::from_config(
            "secret_do_not_print".to_string(),
            &NotionConfig::default(),
        ))
        .unwrap();
        assert!(!format!("{client:?}").contains("secret_do_not_print"));
    }

    #[test]
    fn test_zero_rate_limit_does_not_panic() {
        let notion = NotionConfig {
            requests_per_second: 0,
            ..NotionConfig::default()
        };
        assert!(NotionHttpClient::with_config(NotionClientConfig::from_config(
            "t".to_string(),
            &notion
        ))
        .is_ok());
    }
}
