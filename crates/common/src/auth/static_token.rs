//! Pre-issued token acquirer
//!
//! Serves a token obtained out of band (configuration, environment) without
//! any interactive flow.

use tracing::debug;

use super::session::SessionToken;
use super::traits::TokenAcquirer;
use super::types::{AcquireRequest, AuthError};

/// Returns the same pre-issued token on every acquisition
#[derive(Debug, Clone)]
pub struct StaticTokenAcquirer {
    token: SessionToken,
}

impl StaticTokenAcquirer {
    #[must_use]
    pub const fn new(token: SessionToken) -> Self {
        Self { token }
    }
}

impl TokenAcquirer for StaticTokenAcquirer {
    fn acquire(&self, _request: &AcquireRequest) -> Result<SessionToken, AuthError> {
        if self.token.is_expired() {
            return Err(AuthError::failure(
                "configured access token has expired; obtain a new one",
            ));
        }

        debug!(user_id = self.token.user_id(), "Using configured access token");
        Ok(self.token.clone())
    }
}
