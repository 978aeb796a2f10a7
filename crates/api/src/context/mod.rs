//! Application context - wires configuration into a ready client

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use vknet_common::auth::{
    AuthorizationSurface, AuthorizeConfig, Credentials, RedirectFlowAcquirer, SessionToken,
    StaticTokenAcquirer, TokenAcquirer,
};
use vknet_domain::{AuthConfig, VkConfig, VkNetError};
use vknet_infra::config::login_timing;
use vknet_infra::{ApiClient, ApiError, HttpTransport};

use crate::adapters::TerminalSurface;
use crate::commands::Vk;

/// Application context - holds the configured client and its wrappers
pub struct AppContext {
    pub config: VkConfig,
    pub vk: Vk,
    cancel: CancellationToken,
}

impl AppContext {
    /// Context for the command line.
    ///
    /// A configured access token is used as-is; otherwise sessions are
    /// acquired by signing in through the terminal. Configured credentials
    /// are ignored in the terminal flow since it cannot fill in forms.
    ///
    /// # Errors
    /// [`ApiError::Config`] for inconsistent settings and
    /// [`ApiError::InvalidArgument`] for an invalid application identity.
    pub fn new(config: VkConfig) -> Result<Self, ApiError> {
        if let Some(acquirer) = static_acquirer(&config.auth)? {
            info!("Using configured access token");
            return Self::with_parts(config, Arc::new(acquirer), None);
        }

        if config.auth.email.is_some() {
            warn!("Terminal sign-in cannot fill in the login form; ignoring configured credentials");
        }

        let cancel = CancellationToken::new();
        let acquirer = redirect_acquirer(TerminalSurface::stdio(), &config, cancel.clone());
        Self::build(config, Arc::new(acquirer), None, None, cancel)
    }

    /// Context acquiring sessions through `surface`.
    ///
    /// Configured credentials enable automatic login.
    ///
    /// # Errors
    /// Same as [`AppContext::new`].
    pub fn with_surface<S>(config: VkConfig, surface: S) -> Result<Self, ApiError>
    where
        S: AuthorizationSurface + 'static,
    {
        let credentials = credentials(&config.auth)?;
        let cancel = CancellationToken::new();
        let acquirer = redirect_acquirer(surface, &config, cancel.clone());
        Self::build(config, Arc::new(acquirer), None, credentials, cancel)
    }

    /// Context from explicit parts; `transport` defaults to the reqwest
    /// client.
    ///
    /// # Errors
    /// Same as [`AppContext::new`].
    pub fn with_parts(
        config: VkConfig,
        acquirer: Arc<dyn TokenAcquirer>,
        transport: Option<Arc<dyn HttpTransport>>,
    ) -> Result<Self, ApiError> {
        let credentials = credentials(&config.auth)?;
        Self::build(config, acquirer, transport, credentials, CancellationToken::new())
    }

    /// Token that aborts a pending manual sign-in when cancelled.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn client(&self) -> &ApiClient {
        self.vk.client()
    }

    fn build(
        config: VkConfig,
        acquirer: Arc<dyn TokenAcquirer>,
        transport: Option<Arc<dyn HttpTransport>>,
        credentials: Option<Credentials>,
        cancel: CancellationToken,
    ) -> Result<Self, ApiError> {
        let scopes = config.app.permissions()?;

        let mut builder = ApiClient::builder()
            .base_url(config.api.base_url.clone())
            .app_id(config.app.app_id)
            .scopes(scopes)
            .credentials(credentials)
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .user_agent(config.api.user_agent.clone())
            .acquirer(acquirer);
        if let Some(transport) = transport {
            builder = builder.transport(transport);
        }
        let client = Arc::new(builder.build()?);

        info!(
            app_id = config.app.app_id,
            base_url = %config.api.base_url,
            "Application context initialized"
        );

        Ok(Self { config, vk: Vk::new(client), cancel })
    }
}

fn redirect_acquirer<S: AuthorizationSurface>(
    surface: S,
    config: &VkConfig,
    cancel: CancellationToken,
) -> RedirectFlowAcquirer<S> {
    let (poll_interval, login_timeout) = login_timing(&config.auth);

    RedirectFlowAcquirer::new(surface, AuthorizeConfig::new(config.api.oauth_host.clone()))
        .with_poll_interval(poll_interval)
        .with_login_timeout(login_timeout)
        .with_cancellation(cancel)
}

/// Acquirer for a pre-issued token, if one is configured.
///
/// The lifetime counts from the configured issue time, or from now when
/// none is set.
fn static_acquirer(auth: &AuthConfig) -> Result<Option<StaticTokenAcquirer>, VkNetError> {
    let Some(token) = auth.access_token.as_deref() else {
        return Ok(None);
    };

    let user_id = auth.user_id.ok_or_else(|| {
        VkNetError::Config("a configured access token requires the matching user id".to_string())
    })?;

    let token = match auth.issued_at {
        Some(issued) => SessionToken::issued_at(user_id, token, auth.expires_in, issued),
        None => SessionToken::new(user_id, token, auth.expires_in),
    };

    Ok(Some(StaticTokenAcquirer::new(token)))
}

fn credentials(auth: &AuthConfig) -> Result<Option<Credentials>, VkNetError> {
    match (&auth.email, &auth.password) {
        (Some(email), Some(password)) => Ok(Some(Credentials::new(email, password))),
        (None, None) => Ok(None),
        _ => Err(VkNetError::Config("email and password must be configured together".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};
    use vknet_common::auth::{AcquireRequest, AuthError, Permission};
    use vknet_domain::AppConfig;

    use super::*;

    fn request() -> AcquireRequest {
        AcquireRequest { app_id: 1, scopes: vec![Permission::Friends], credentials: None }
    }

    #[test]
    fn access_token_requires_user_id() {
        let auth = AuthConfig { access_token: Some("tok".into()), ..AuthConfig::default() };
        assert!(matches!(static_acquirer(&auth), Err(VkNetError::Config(_))));

        let auth = AuthConfig { user_id: Some(3), ..auth };
        assert!(static_acquirer(&auth).unwrap().is_some());
    }

    #[test]
    fn configured_issue_time_drives_expiry() {
        let issued = Utc::now() - TimeDelta::days(2);
        let auth = AuthConfig {
            access_token: Some("tok".into()),
            user_id: Some(3),
            expires_in: 86_400,
            issued_at: Some(issued),
            ..AuthConfig::default()
        };

        let stale = static_acquirer(&auth).unwrap().unwrap();
        assert!(matches!(stale.acquire(&request()), Err(AuthError::Failure { .. })));

        let fresh = static_acquirer(&AuthConfig { issued_at: None, ..auth }).unwrap().unwrap();
        assert_eq!(fresh.acquire(&request()).unwrap().user_id(), 3);
    }

    #[test]
    fn credentials_come_in_pairs() {
        let half = AuthConfig { email: Some("me@example.com".into()), ..AuthConfig::default() };
        assert!(credentials(&half).is_err());

        let full = AuthConfig { password: Some("secret".into()), ..half };
        assert_eq!(credentials(&full).unwrap().unwrap().email, "me@example.com");
        assert!(credentials(&AuthConfig::default()).unwrap().is_none());
    }

    #[test]
    fn unknown_scope_fails_construction() {
        let config = VkConfig {
            app: AppConfig { app_id: 1, scopes: vec!["everything".into()] },
            auth: AuthConfig {
                access_token: Some("tok".into()),
                user_id: Some(1),
                ..AuthConfig::default()
            },
            ..VkConfig::default()
        };

        assert!(matches!(AppContext::new(config), Err(ApiError::Config(_))));
    }
}
