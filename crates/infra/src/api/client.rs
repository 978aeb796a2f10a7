//! API client with lazy session acquisition
//!
//! Provides the single entry point for remote method calls: ensure a valid
//! session, build the method URL, perform one blocking GET and decode the
//! response into the requested shape.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};
use vknet_common::auth::{AcquireRequest, Credentials, Permission, SessionToken, TokenAcquirer};
use vknet_domain::constants::{
    ACCESS_TOKEN_PARAM, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    RESPONSE_FORMAT,
};

use super::decoder::{ResponseDecoder, ResponseShape};
use super::errors::ApiError;
use super::request::ApiRequest;
use crate::http::{HttpClient, HttpTransport};

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL the `method/<name>.xml` path is appended to
    pub base_url: String,
    /// Registered application id
    pub app_id: u32,
    /// Scopes requested when a session is acquired
    pub scopes: Vec<Permission>,
    /// Enables automatic login when present
    pub credentials: Option<Credentials>,
    /// Timeout for API requests
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            app_id: 0,
            scopes: Vec::new(),
            credentials: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ApiClientConfig {
    fn validate(&self) -> Result<(), ApiError> {
        if self.app_id == 0 {
            return Err(ApiError::InvalidArgument("application id cannot be zero".to_string()));
        }

        if self.scopes.is_empty() {
            return Err(ApiError::InvalidArgument(
                "application must request at least one permission".to_string(),
            ));
        }

        if let Some(credentials) = &self.credentials {
            if credentials.email.is_empty() {
                return Err(ApiError::InvalidArgument("email cannot be empty".to_string()));
            }
            if credentials.password.is_empty() {
                return Err(ApiError::InvalidArgument("password cannot be empty".to_string()));
            }
        }

        Ok(())
    }
}

/// Client for the remote method API
///
/// Owns the cached session. Acquisition is serialized by its own lock held
/// across the check-acquire-store sequence, so concurrent callers sharing one
/// client trigger at most one acquisition. The session slot itself is only
/// locked for reads and writes, never while a login is in progress.
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    acquirer: Arc<dyn TokenAcquirer>,
    base_url: String,
    acquire_request: AcquireRequest,
    acquisition: Mutex<()>,
    session: Mutex<Option<SessionToken>>,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    ///
    /// * `config` - Client configuration
    /// * `acquirer` - Session acquisition strategy
    /// * `transport` - HTTP transport
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] for a zero application id, an
    /// empty scope list or credentials with an empty email or password.
    pub fn new(
        config: ApiClientConfig,
        acquirer: Arc<dyn TokenAcquirer>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ApiError> {
        config.validate()?;

        Ok(Self {
            transport,
            acquirer,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            acquire_request: AcquireRequest {
                app_id: config.app_id,
                scopes: config.scopes,
                credentials: config.credentials,
            },
            acquisition: Mutex::new(()),
            session: Mutex::new(None),
        })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Execute a remote method call
    ///
    /// # Arguments
    ///
    /// * `request` - Method name and parameters
    ///
    /// # Returns
    ///
    /// The response decoded into shape `S`
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidArgument`] for an empty method name, before any
    ///   authentication or network access
    /// - [`ApiError::Auth`] when a session cannot be acquired
    /// - [`ApiError::Transport`] when the call fails, returns a non-success
    ///   status or an empty body
    /// - [`ApiError::RemoteApi`], [`ApiError::UnknownRemote`],
    ///   [`ApiError::Decode`] from decoding
    #[instrument(skip(self, request), fields(method = %request.method_name()))]
    pub fn call<S: ResponseShape>(&self, request: &ApiRequest) -> Result<S::Output, ApiError> {
        if request.method_name().trim().is_empty() {
            return Err(ApiError::InvalidArgument("method name cannot be empty".to_string()));
        }

        let session = self.ensure_session()?;
        let url = self.method_url(request, session.token());
        debug!(url = %self.method_url(request, "<redacted>"), "GET request");

        let response = self.transport.get(&url).map_err(|e| {
            warn!(error = %e, "API request failed");
            ApiError::from(e)
        })?;

        if !response.is_success() {
            warn!(status = response.status, "API request returned error status");
            return Err(ApiError::Transport(format!("unexpected HTTP status {}", response.status)));
        }

        if response.body.trim().is_empty() {
            return Err(ApiError::Transport("empty response body".to_string()));
        }

        debug!(bytes = response.body.len(), "Decoding response");
        ResponseDecoder::decode::<S>(&response.body).inspect_err(|e| {
            if let ApiError::RemoteApi { code, message } = e {
                warn!(code, %message, "Remote API returned an error");
            }
        })
    }

    /// Id of the authenticated user, acquiring a session if needed.
    ///
    /// # Errors
    /// Returns [`ApiError::Auth`] when a session cannot be acquired.
    pub fn user_id(&self) -> Result<u32, ApiError> {
        Ok(self.ensure_session()?.user_id())
    }

    /// Currently cached session, if any, expired or not. Never triggers
    /// acquisition and does not wait for one in progress.
    pub fn session(&self) -> Option<SessionToken> {
        self.session.lock().clone()
    }

    /// Drop the cached session; the next call acquires a new one.
    pub fn invalidate_session(&self) {
        if self.session.lock().take().is_some() {
            info!("Session invalidated");
        }
    }

    fn ensure_session(&self) -> Result<SessionToken, ApiError> {
        if let Some(token) = self.valid_session() {
            return Ok(token);
        }

        let _acquiring = self.acquisition.lock();

        // Stored by another caller while this one waited.
        if let Some(token) = self.valid_session() {
            return Ok(token);
        }

        if let Some(expired) = self.session.lock().as_ref() {
            debug!(user_id = expired.user_id(), "Session expired, acquiring a new one");
        }

        let token = self.acquirer.acquire(&self.acquire_request).map_err(|e| {
            warn!(error = %e, "Session acquisition failed");
            ApiError::from(e)
        })?;
        info!(user_id = token.user_id(), offline = token.is_offline(), "Session established");

        *self.session.lock() = Some(token.clone());
        Ok(token)
    }

    fn valid_session(&self) -> Option<SessionToken> {
        self.session.lock().as_ref().filter(|token| !token.is_expired()).cloned()
    }

    fn method_url(&self, request: &ApiRequest, token: &str) -> String {
        format!(
            "{}/method/{}.{}?{}{}={}",
            self.base_url,
            request.method_name(),
            RESPONSE_FORMAT,
            request.query_prefix(),
            ACCESS_TOKEN_PARAM,
            urlencoding::encode(token)
        )
    }
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    config: ApiClientConfig,
    acquirer: Option<Arc<dyn TokenAcquirer>>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ApiClientBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn app_id(mut self, app_id: u32) -> Self {
        self.config.app_id = app_id;
        self
    }

    pub fn scopes(mut self, scopes: impl IntoIterator<Item = Permission>) -> Self {
        self.config.scopes = scopes.into_iter().collect();
        self
    }

    pub fn credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.config.credentials = credentials;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    pub fn acquirer(mut self, acquirer: Arc<dyn TokenAcquirer>) -> Self {
        self.acquirer = Some(acquirer);
        self
    }

    /// Use a custom transport instead of the default reqwest client.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when no acquirer is set or the HTTP
    /// client cannot be built, and [`ApiError::InvalidArgument`] for invalid
    /// configuration.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let acquirer = self
            .acquirer
            .ok_or_else(|| ApiError::Config("a token acquirer is required".to_string()))?;

        self.config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                HttpClient::builder()
                    .timeout(self.config.timeout)
                    .user_agent(self.config.user_agent.clone())
                    .build()
                    .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?,
            ),
        };

        ApiClient::new(self.config, acquirer, transport)
    }
}
