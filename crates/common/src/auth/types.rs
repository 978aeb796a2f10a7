//! Authorization types and redirect handling
//!
//! The remote service uses the OAuth 2.0 implicit grant: the user approves
//! the application on an authorization page, which then redirects to a blank
//! page carrying either the token or an error in the URL.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;
use vknet_domain::Permission;

/// Login and password for automatic form submission
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything an acquirer needs to obtain a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireRequest {
    pub app_id: u32,
    pub scopes: Vec<Permission>,
    /// `Some` enables automatic login; `None` waits for the user.
    pub credentials: Option<Credentials>,
}

/// Error type for session acquisition
#[derive(Debug, Error)]
pub enum AuthError {
    /// The flow ended on an error redirect.
    #[error("Authorization denied: {error}: {description}")]
    Denied { error: String, description: String },

    /// Automatic login did not reach a success or error redirect.
    #[error("Authorization failed, most likely wrong email or password")]
    WrongCredentials,

    /// Any other fault during the flow.
    #[error("Authorization failed: {message}")]
    Failure {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The manual login wait exceeded its deadline.
    #[error("Login timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the manual login wait.
    #[error("Login cancelled")]
    Cancelled,
}

impl AuthError {
    /// Failure without an underlying cause.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure { message: message.into(), source: None }
    }

    /// Failure wrapping an underlying cause.
    pub fn failure_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Failure { message: message.into(), source: Some(Box::new(source)) }
    }
}

/// Authorization page settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizeConfig {
    /// Host serving `/oauth/authorize` and `/blank.html`.
    pub oauth_host: String,
}

impl AuthorizeConfig {
    #[must_use]
    pub fn new(oauth_host: impl Into<String>) -> Self {
        Self { oauth_host: oauth_host.into() }
    }

    /// Blank page the authorization server redirects to.
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        format!("http://{}/blank.html", self.oauth_host)
    }

    /// Build the authorization page URL.
    ///
    /// # Errors
    /// Returns [`AuthError::Failure`] when the host does not form a valid URL.
    pub fn authorization_url(&self, app_id: u32, scopes: &[Permission]) -> Result<Url, AuthError> {
        let base = format!("https://{}/oauth/authorize", self.oauth_host);
        Url::parse_with_params(
            &base,
            &[
                ("client_id", app_id.to_string()),
                ("scope", Permission::join(scopes)),
                ("response_type", "token".to_string()),
                ("redirect_uri", self.redirect_uri()),
            ],
        )
        .map_err(|e| AuthError::failure_with("invalid authorization URL", e))
    }
}

/// Outcome encoded in the redirect URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    Granted { access_token: String, expires_in: u64, user_id: u32 },
    Denied { error: String, description: String },
}

/// Whether the URL has reached a success or error redirect.
///
/// Matching is case-insensitive, on the raw URL text.
#[must_use]
pub fn is_terminal_redirect(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.contains("access_token=") || lower.contains("error=")
}

/// Parse the final redirect URL.
///
/// Parameters may sit in the query or in the fragment; fragment values win.
/// A missing `expires_in` means offline access.
///
/// # Errors
/// Returns [`AuthError::Failure`] when the URL cannot be parsed or a success
/// redirect lacks `access_token` or a numeric `user_id`.
pub fn parse_redirect(raw: &str) -> Result<RedirectOutcome, AuthError> {
    let url = Url::parse(raw).map_err(|e| AuthError::failure_with("malformed redirect URL", e))?;

    let mut params: Vec<(String, String)> =
        url.query_pairs().map(|(k, v)| (k.to_ascii_lowercase(), v.into_owned())).collect();
    if let Some(fragment) = url.fragment() {
        params.extend(
            url::form_urlencoded::parse(fragment.as_bytes())
                .map(|(k, v)| (k.to_ascii_lowercase(), v.into_owned())),
        );
    }

    let lookup =
        |name: &str| params.iter().rev().find(|(k, _)| k == name).map(|(_, v)| v.as_str());

    if let Some(error) = lookup("error") {
        return Ok(RedirectOutcome::Denied {
            error: error.to_string(),
            description: lookup("error_description").unwrap_or_default().to_string(),
        });
    }

    let access_token = lookup("access_token")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::failure("redirect carries no access_token"))?
        .to_string();

    let expires_in = match lookup("expires_in") {
        Some(raw) => raw
            .parse()
            .map_err(|e| AuthError::failure_with(format!("invalid expires_in: {raw}"), e))?,
        None => 0,
    };

    let user_id = lookup("user_id")
        .ok_or_else(|| AuthError::failure("redirect carries no user_id"))?;
    let user_id = user_id
        .parse()
        .map_err(|e| AuthError::failure_with(format!("invalid user_id: {user_id}"), e))?;

    Ok(RedirectOutcome::Granted { access_token, expires_in, user_id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url_layout() {
        let config = AuthorizeConfig::new("oauth.vk.com");
        let url = config
            .authorization_url(2_951_857, &[Permission::Friends, Permission::Audio])
            .unwrap();

        assert_eq!(url.host_str(), Some("oauth.vk.com"));
        assert_eq!(url.path(), "/oauth/authorize");

        let pairs: Vec<(String, String)> =
            url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        assert_eq!(pairs[0], ("client_id".to_string(), "2951857".to_string()));
        assert_eq!(pairs[1], ("scope".to_string(), "friends,audio".to_string()));
        assert_eq!(pairs[2], ("response_type".to_string(), "token".to_string()));
        assert_eq!(
            pairs[3],
            ("redirect_uri".to_string(), "http://oauth.vk.com/blank.html".to_string())
        );
    }

    #[test]
    fn test_parse_fragment_success() {
        let outcome = parse_redirect(
            "http://oauth.vk.com/blank.html#access_token=abc123&expires_in=86400&user_id=42",
        )
        .unwrap();

        assert_eq!(
            outcome,
            RedirectOutcome::Granted {
                access_token: "abc123".to_string(),
                expires_in: 86_400,
                user_id: 42
            }
        );
    }

    #[test]
    fn test_parse_query_success_without_expiry() {
        let outcome =
            parse_redirect("http://oauth.vk.com/blank.html?access_token=t&user_id=5").unwrap();
        assert!(matches!(outcome, RedirectOutcome::Granted { expires_in: 0, user_id: 5, .. }));
    }

    #[test]
    fn test_parse_error_redirect_decodes_text() {
        let outcome = parse_redirect(
            "http://oauth.vk.com/blank.html#error=access_denied&error_description=User%20denied%20your%20request",
        )
        .unwrap();

        assert_eq!(
            outcome,
            RedirectOutcome::Denied {
                error: "access_denied".to_string(),
                description: "User denied your request".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_missing_user_id() {
        let err = parse_redirect("http://oauth.vk.com/blank.html#access_token=t").unwrap_err();
        assert!(matches!(err, AuthError::Failure { .. }));
    }

    #[test]
    fn test_terminal_markers_are_case_insensitive() {
        assert!(is_terminal_redirect("http://x/blank.html#ACCESS_TOKEN=t"));
        assert!(is_terminal_redirect("http://x/blank.html#Error=denied"));
        assert!(!is_terminal_redirect("https://x/oauth/authorize?client_id=1"));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let debug = format!("{:?}", Credentials::new("me@example.com", "hunter2"));
        assert!(debug.contains("me@example.com"));
        assert!(!debug.contains("hunter2"));
    }
}
