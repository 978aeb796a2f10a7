//! Traits for session acquisition
//!
//! These traits enable dependency injection and testing by abstracting the
//! interactive parts of authorization (the user, the browser).

use super::session::SessionToken;
use super::types::{AcquireRequest, AuthError, Credentials};

/// Obtains a fresh session token
///
/// The API client calls this lazily, at most once per expired or missing
/// token, while holding its token-slot lock.
pub trait TokenAcquirer: Send + Sync {
    /// Run the acquisition flow.
    ///
    /// # Errors
    /// - [`AuthError::Denied`] when the flow ends on an error redirect
    /// - [`AuthError::WrongCredentials`] when automatic login stalls
    /// - [`AuthError::Timeout`] / [`AuthError::Cancelled`] for an abandoned
    ///   manual login
    /// - [`AuthError::Failure`] for anything else
    fn acquire(&self, request: &AcquireRequest) -> Result<SessionToken, AuthError>;
}

/// Something that can show the authorization page and report where it went
///
/// Implemented by browser drivers in production and by scripted fakes in
/// tests. Every method may fail; failures abort the flow as
/// [`AuthError::Failure`].
pub trait AuthorizationSurface: Send + Sync {
    /// Navigate to `url`.
    fn open(&self, url: &str) -> Result<(), AuthError>;

    /// URL currently displayed.
    fn current_url(&self) -> Result<String, AuthError>;

    /// Whether email and password fields are present.
    fn has_login_form(&self) -> Result<bool, AuthError>;

    /// Fill in the login form and press the allow button.
    fn submit_login(&self, credentials: &Credentials) -> Result<(), AuthError>;

    /// Whether the application-permission allow button is present.
    fn has_allow_button(&self) -> Result<bool, AuthError>;

    fn click_allow(&self) -> Result<(), AuthError>;

    /// Release the surface, clearing any cookies it holds.
    fn close(&self) -> Result<(), AuthError>;
}

impl<T: TokenAcquirer + ?Sized> TokenAcquirer for std::sync::Arc<T> {
    fn acquire(&self, request: &AcquireRequest) -> Result<SessionToken, AuthError> {
        (**self).acquire(request)
    }
}

impl<T: TokenAcquirer + ?Sized> TokenAcquirer for Box<T> {
    fn acquire(&self, request: &AcquireRequest) -> Result<SessionToken, AuthError> {
        (**self).acquire(request)
    }
}

impl<T: AuthorizationSurface + ?Sized> AuthorizationSurface for std::sync::Arc<T> {
    fn open(&self, url: &str) -> Result<(), AuthError> {
        (**self).open(url)
    }

    fn current_url(&self) -> Result<String, AuthError> {
        (**self).current_url()
    }

    fn has_login_form(&self) -> Result<bool, AuthError> {
        (**self).has_login_form()
    }

    fn submit_login(&self, credentials: &Credentials) -> Result<(), AuthError> {
        (**self).submit_login(credentials)
    }

    fn has_allow_button(&self) -> Result<bool, AuthError> {
        (**self).has_allow_button()
    }

    fn click_allow(&self) -> Result<(), AuthError> {
        (**self).click_allow()
    }

    fn close(&self) -> Result<(), AuthError> {
        (**self).close()
    }
}
