/// Quake API client module
use crate::config::AppConfig;
use crate::domain::{FetchResult, QueryParams};
use crate::errors::{ApiResult, FetchError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quakewatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// Anything that can answer a filtered quake query
#[async_trait]
pub trait QuakeSource: Send + Sync {
    async fn fetch_quakes(&self, params: &QueryParams) -> ApiResult<FetchResult>;
}

/// Client for the `/quakes` endpoint
pub struct QuakeClient {
    http_client: HttpClient,
    base_url: String,
}

impl QuakeClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(timeout)?,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &AppConfig) -> ApiResult<Self> {
        Self::new(config.api_base.clone(), config.request_timeout)
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> String {
        format!("{}/quakes", self.base_url)
    }
}

#[async_trait]
impl QuakeSource for QuakeClient {
    /// Fetch one page of quakes for the given filters
    async fn fetch_quakes(&self, params: &QueryParams) -> ApiResult<FetchResult> {
        let resp = self
            .http_client
            .get_client()
            .get(self.endpoint())
            .query(&params.to_query())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        debug!(bytes = body.len(), "quake payload received");
        let result = serde_json::from_slice::<FetchResult>(&body)?;
        Ok(result)
    }
}
