/*!
 * HTTP transport used by every network stage of the pipeline.
 *
 * The pipeline only talks to the `HttpTransport` trait, so the reqwest
 * implementation can be swapped for a scripted one in tests. Headers and
 * bodies are passed per call; implementations must not carry them over
 * from one request to the next.
 */

use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use std::time::Duration;
use log::error;

use crate::errors::TransportError;

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Common trait for HTTP transports
#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    /// Issue a GET request
    ///
    /// # Arguments
    /// * `url` - Absolute request URL
    /// * `headers` - Header name/value pairs for this request only
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, TransportError>;

    /// Issue a POST request with a JSON body
    ///
    /// # Arguments
    /// * `url` - Absolute request URL
    /// * `headers` - Header name/value pairs for this request only
    /// * `body` - JSON document sent as the request body
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError>;
}

/// Transport backed by a pooled reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// HTTP client for making requests
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests time out after `timeout_secs`
    pub fn new(timeout_secs: u64) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            // Keep connections alive between pipeline stages
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| TransportError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<HttpResponse, TransportError> {
        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                TransportError::ConnectionError(e.to_string())
            } else {
                TransportError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read response body ({}): {}", status, e);
            TransportError::BodyError(e.to_string())
        })?;

        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        self.execute(request).await
    }

    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError> {
        let mut request = self.client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        self.execute(request).await
    }
}
