//! Query backend access.
//!
//! [`AskBackend`] is the seam the widget dispatches through;
//! [`HttpAskClient`] is the `reqwest` implementation talking to a real
//! `/ask` endpoint.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::BackendConfig;
use crate::error::Result;
use crate::message::{QueryRequest, QueryResponse};

/// Default path of the query endpoint.
pub const DEFAULT_ASK_PATH: &str = "/ask";

/// Default time allowed for a `/health` check.
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// A backend that answers queries.
#[async_trait]
pub trait AskBackend: Send + Sync {
    /// Perform one query round-trip.
    async fn ask(&self, request: &QueryRequest) -> Result<QueryResponse>;
}

#[async_trait]
impl<T: AskBackend + ?Sized> AskBackend for Arc<T> {
    async fn ask(&self, request: &QueryRequest) -> Result<QueryResponse> {
        (**self).ask(request).await
    }
}

/// HTTP client for the query backend.
///
/// # Example
///
/// ```rust,no_run
/// use query_chat::client::{AskBackend, HttpAskClient};
/// use query_chat::message::QueryRequest;
///
/// # async fn example() -> query_chat::Result<()> {
/// let client = HttpAskClient::new("http://localhost:8080")?;
/// let response = client
///     .ask(&QueryRequest { query: "total revenue".into() })
///     .await?;
/// println!("{}", response.answer_text());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpAskClient {
    base_url: Url,
    ask_path: String,
    health_timeout: Duration,
    http: reqwest::Client,
}

impl HttpAskClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the backend (e.g., "http://localhost:8080")
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a new client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self {
            base_url,
            ask_path: DEFAULT_ASK_PATH.to_string(),
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
            http,
        })
    }

    /// Create a client from configuration, applying timeout and path.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(&config.base_url, http)?.with_ask_path(&config.ask_path))
    }

    /// Use a different query endpoint path.
    #[must_use]
    pub fn with_ask_path(mut self, path: impl Into<String>) -> Self {
        self.ask_path = path.into();
        self
    }

    /// Time allowed for [`health`](Self::health), independent of the query timeout.
    #[must_use]
    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of the query endpoint.
    pub fn ask_url(&self) -> Result<Url> {
        self.url(&self.ask_path)
    }

    /// Probe `GET /health` and return the reported status.
    pub async fn health(&self) -> Result<String> {
        let response = self
            .http
            .get(self.url("/health")?)
            .timeout(self.health_timeout)
            .send()
            .await?;
        let body: Value = serde_json::from_slice(&response.bytes().await?)?;
        Ok(body
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string())
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

#[async_trait]
impl AskBackend for HttpAskClient {
    /// `POST` the query as JSON. Any status is accepted; the body must be JSON.
    async fn ask(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let response = self
            .http
            .post(self.ask_url()?)
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(
            name: "backend.ask.response",
            status = status.as_u16(),
            bytes = body.len(),
            "Query response received"
        );

        let value: Value = serde_json::from_slice(&body)?;
        Ok(QueryResponse::from_value(value))
    }
}
