//! Configuration management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_LOGIN_POLL_INTERVAL_MS, DEFAULT_OAUTH_HOST,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::errors::{Result, VkNetError};
use crate::types::Permission;

/// Client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VkConfig {
    pub app: AppConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Registered application identity
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub app_id: u32,
    /// Permission scope names requested at authorization time.
    pub scopes: Vec<String>,
}

impl AppConfig {
    /// Parse the configured scope names.
    ///
    /// # Errors
    /// Returns [`VkNetError::Config`] for an unknown scope name or an empty
    /// list.
    pub fn permissions(&self) -> Result<Vec<Permission>> {
        if self.scopes.is_empty() {
            return Err(VkNetError::Config("at least one scope is required".to_string()));
        }

        self.scopes
            .iter()
            .map(|s| s.trim().parse::<Permission>().map_err(VkNetError::Config))
            .collect()
    }
}

/// Remote endpoint and transport settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub oauth_host: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            oauth_host: DEFAULT_OAUTH_HOST.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Session acquisition settings
///
/// `email`/`password` enable automatic form submission. `access_token` with
/// `user_id` skips the interactive flow entirely.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AuthConfig {
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub poll_interval_ms: u64,
    /// Upper bound for the manual login wait; `None` waits until cancelled.
    pub login_timeout_secs: Option<u64>,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    pub user_id: Option<u32>,
    /// Lifetime of `access_token`; `0` means offline access.
    pub expires_in: u64,
    /// When `access_token` was issued. `expires_in` counts from here, or from
    /// process start when unset.
    pub issued_at: Option<DateTime<Utc>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            email: None,
            password: None,
            poll_interval_ms: DEFAULT_LOGIN_POLL_INTERVAL_MS,
            login_timeout_secs: None,
            access_token: None,
            user_id: None,
            expires_in: 0,
            issued_at: None,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("login_timeout_secs", &self.login_timeout_secs)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("user_id", &self.user_id)
            .field("expires_in", &self.expires_in)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_sections() {
        let config: VkConfig =
            serde_json::from_str(r#"{"app":{"app_id":42,"scopes":["friends"]}}"#).unwrap();

        assert_eq!(config.app.app_id, 42);
        assert_eq!(config.api, ApiConfig::default());
        assert_eq!(config.auth.poll_interval_ms, DEFAULT_LOGIN_POLL_INTERVAL_MS);
        assert!(config.auth.login_timeout_secs.is_none());
    }

    #[test]
    fn scope_names_parse_into_permissions() {
        let app = AppConfig { app_id: 1, scopes: vec!["friends".into(), " Audio".into()] };
        assert_eq!(app.permissions().unwrap(), vec![Permission::Friends, Permission::Audio]);

        let unknown = AppConfig { app_id: 1, scopes: vec!["everything".into()] };
        assert!(matches!(unknown.permissions(), Err(VkNetError::Config(_))));

        let empty = AppConfig { app_id: 1, scopes: vec![] };
        assert!(empty.permissions().is_err());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let auth = AuthConfig {
            password: Some("hunter2".to_string()),
            access_token: Some("secret-token".to_string()),
            ..AuthConfig::default()
        };

        let rendered = format!("{auth:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
