//! Redirect-driven session acquisition
//!
//! Drives an [`AuthorizationSurface`] through the implicit-grant flow:
//!
//! ```text
//! open(authorize URL)
//!   ├─ credentials given ─► submit login form ─► click allow ─► check URL once
//!   └─ no credentials ────► poll current URL until a redirect marker appears
//! parse redirect ─► SessionToken (lifetime reduced by time spent in the flow)
//! close()
//! ```

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::session::SessionToken;
use super::traits::{AuthorizationSurface, TokenAcquirer};
use super::types::{
    is_terminal_redirect, parse_redirect, AcquireRequest, AuthError, AuthorizeConfig,
    Credentials, RedirectOutcome,
};
use crate::time::{Clock, SystemClock};

/// Default delay between URL checks while waiting for a manual login.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Acquires sessions by walking the user (or a script) through the
/// authorization page
pub struct RedirectFlowAcquirer<S: AuthorizationSurface, C: Clock = SystemClock> {
    surface: S,
    clock: C,
    authorize: AuthorizeConfig,
    poll_interval: Duration,
    login_timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl<S: AuthorizationSurface> RedirectFlowAcquirer<S> {
    /// Create an acquirer using the system clock, polling every three seconds
    /// and waiting for a manual login indefinitely.
    #[must_use]
    pub fn new(surface: S, authorize: AuthorizeConfig) -> Self {
        Self {
            surface,
            clock: SystemClock,
            authorize,
            poll_interval: DEFAULT_POLL_INTERVAL,
            login_timeout: None,
            cancel: CancellationToken::new(),
        }
    }
}

impl<S: AuthorizationSurface, C: Clock> RedirectFlowAcquirer<S, C> {
    /// Replace the clock used for elapsed-time measurement and polling.
    #[must_use]
    pub fn with_clock<C2: Clock>(self, clock: C2) -> RedirectFlowAcquirer<S, C2> {
        RedirectFlowAcquirer {
            surface: self.surface,
            clock,
            authorize: self.authorize,
            poll_interval: self.poll_interval,
            login_timeout: self.login_timeout,
            cancel: self.cancel,
        }
    }

    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Give up on a manual login after `timeout`.
    #[must_use]
    pub const fn with_login_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.login_timeout = timeout;
        self
    }

    /// Use an externally owned cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that aborts a manual login wait when cancelled.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn run(&self, request: &AcquireRequest) -> Result<SessionToken, AuthError> {
        let started = self.clock.now();

        let url = self.authorize.authorization_url(request.app_id, &request.scopes)?;
        self.surface.open(url.as_str())?;

        let final_url = match &request.credentials {
            Some(credentials) => self.auto_login(credentials)?,
            None => self.wait_for_user(started)?,
        };

        match parse_redirect(&final_url)? {
            RedirectOutcome::Denied { error, description } => {
                Err(AuthError::Denied { error, description })
            }
            RedirectOutcome::Granted { access_token, expires_in, user_id } => {
                let elapsed = self.clock.now().duration_since(started);
                let lifetime = remaining_lifetime(expires_in, elapsed);
                Ok(SessionToken::issued_at(user_id, access_token, lifetime, self.clock.utc_now()))
            }
        }
    }

    fn auto_login(&self, credentials: &Credentials) -> Result<String, AuthError> {
        let url = self.surface.current_url()?;
        if is_terminal_redirect(&url) {
            return Ok(url);
        }

        if self.surface.has_login_form()? {
            debug!("Submitting login form");
            self.surface.submit_login(credentials)?;
        }

        if self.surface.has_allow_button()? {
            debug!("Accepting application permissions");
            self.surface.click_allow()?;
        }

        let url = self.surface.current_url()?;
        if is_terminal_redirect(&url) {
            Ok(url)
        } else {
            Err(AuthError::WrongCredentials)
        }
    }

    fn wait_for_user(&self, started: std::time::Instant) -> Result<String, AuthError> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(AuthError::Cancelled);
            }

            let url = self.surface.current_url()?;
            if is_terminal_redirect(&url) {
                return Ok(url);
            }

            if let Some(limit) = self.login_timeout {
                if self.clock.now().duration_since(started) >= limit {
                    return Err(AuthError::Timeout(limit));
                }
            }

            debug!(interval = ?self.poll_interval, "Waiting for user login");
            self.clock.sleep(self.poll_interval);
        }
    }
}

impl<S: AuthorizationSurface, C: Clock> TokenAcquirer for RedirectFlowAcquirer<S, C> {
    #[instrument(skip_all, fields(app_id = request.app_id, auto_login = request.credentials.is_some()))]
    fn acquire(&self, request: &AcquireRequest) -> Result<SessionToken, AuthError> {
        let result = self.run(request);

        if let Err(e) = self.surface.close() {
            warn!(error = %e, "Failed to close authorization surface");
        }

        match &result {
            Ok(token) => {
                info!(user_id = token.user_id(), offline = token.is_offline(), "Session acquired");
            }
            Err(e) => warn!(error = %e, "Session acquisition failed"),
        }

        result
    }
}

/// Lifetime left after spending `elapsed` in the flow.
///
/// Offline grants stay offline; otherwise at least one second remains.
fn remaining_lifetime(expires_in: u64, elapsed: Duration) -> u64 {
    if expires_in == 0 {
        0
    } else {
        expires_in.saturating_sub(elapsed.as_secs()).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_lifetime() {
        assert_eq!(remaining_lifetime(0, Duration::from_secs(100)), 0);
        assert_eq!(remaining_lifetime(3600, Duration::from_secs(100)), 3500);
        assert_eq!(remaining_lifetime(60, Duration::from_secs(100)), 1);
    }
}
