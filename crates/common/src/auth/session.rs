//! Authenticated session token
//!
//! A token is immutable once issued. When it expires the client acquires a
//! new one and replaces the old value wholesale.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

/// Seconds shaved off the granted lifetime so a token is never sent in its
/// final moments.
const EXPIRY_MARGIN_SECS: i64 = 10;

/// Access token granted to an application on behalf of a user
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    user_id: u32,
    token: String,
    expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// Create a token issued now.
    ///
    /// # Arguments
    /// * `user_id` - Account that granted access
    /// * `token` - Opaque access token
    /// * `lifetime_secs` - Granted lifetime; `0` means offline access (never
    ///   expires)
    #[must_use]
    pub fn new(user_id: u32, token: impl Into<String>, lifetime_secs: u64) -> Self {
        Self::issued_at(user_id, token, lifetime_secs, Utc::now())
    }

    /// Create a token issued at `now`.
    ///
    /// The expiry is `now + lifetime - 10s`, so a lifetime of ten seconds or
    /// less yields a token that is already expired.
    #[must_use]
    pub fn issued_at(
        user_id: u32,
        token: impl Into<String>,
        lifetime_secs: u64,
        now: DateTime<Utc>,
    ) -> Self {
        let expires_at = if lifetime_secs == 0 {
            DateTime::<Utc>::MAX_UTC
        } else {
            let lifetime = i64::try_from(lifetime_secs)
                .ok()
                .and_then(TimeDelta::try_seconds)
                .unwrap_or(TimeDelta::MAX);
            now.checked_add_signed(lifetime - TimeDelta::seconds(EXPIRY_MARGIN_SECS))
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        };

        Self { user_id, token: token.into(), expires_at }
    }

    #[must_use]
    pub const fn user_id(&self) -> u32 {
        self.user_id
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether this is an offline grant with no expiry.
    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.expires_at == DateTime::<Utc>::MAX_UTC
    }

    /// Check expiry against the current wall clock.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check expiry against an explicit instant.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("user_id", &self.user_id)
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
