use std::time::Duration;

use reqwest::blocking::Client as ReqwestClient;
use tracing::debug;
use vknet_domain::constants::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use vknet_domain::VkNetError;

use crate::errors::InfraError;

/// Status and full body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Blocking transport used by the API client.
///
/// One call is one GET with the whole body read into memory. Implementations
/// must not retry.
pub trait HttpTransport: Send + Sync {
    /// Perform a GET request.
    ///
    /// # Errors
    /// Returns [`VkNetError::Network`] when the request cannot be completed.
    fn get(&self, url: &str) -> Result<HttpResponse, VkNetError>;
}

/// Blocking HTTP client with timeout support.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }
}

impl HttpTransport for HttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse, VkNetError> {
        let response = self.client.get(url).send().map_err(|err| {
            debug!(error = %err, "HTTP request failed");
            VkNetError::from(InfraError::from(err))
        })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|err| VkNetError::from(InfraError::from(err)))?;
        debug!(status, bytes = body.len(), "received HTTP response");

        Ok(HttpResponse { status, body })
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn build(self) -> Result<HttpClient, VkNetError> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .no_proxy()
            .build()
            .map_err(|err| VkNetError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}
