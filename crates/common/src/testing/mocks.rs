//! Mock implementations of the auth traits
//!
//! Provides mock objects for testing purposes.

// Allow missing error/panic docs for test mocks - they are designed to be simple
// and errors are clearly indicated by their return types
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::auth::{AcquireRequest, AuthError, AuthorizationSurface, Credentials, SessionToken, TokenAcquirer};

/// Mock token acquirer
///
/// Returns queued results first, then the fallback token. Counts every call
/// and keeps the requests it received.
///
/// # Examples
///
/// ```ignore
/// use vknet_common::auth::{AcquireRequest, SessionToken, TokenAcquirer};
/// use vknet_common::testing::MockTokenAcquirer;
///
/// let acquirer = MockTokenAcquirer::new(SessionToken::new(1, "T", 0));
/// let request = AcquireRequest { app_id: 1, scopes: vec![], credentials: None };
///
/// assert_eq!(acquirer.acquire(&request).unwrap().token(), "T");
/// assert_eq!(acquirer.calls(), 1);
/// ```
#[derive(Debug)]
pub struct MockTokenAcquirer {
    queued: Mutex<VecDeque<Result<SessionToken, AuthError>>>,
    fallback: Option<SessionToken>,
    calls: AtomicUsize,
    requests: Mutex<Vec<AcquireRequest>>,
    delay: Duration,
}

impl MockTokenAcquirer {
    /// Acquirer that always grants `token`.
    pub fn new(token: SessionToken) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback: Some(token),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    /// Acquirer with no fallback; unqueued calls fail.
    pub fn failing() -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    /// Block every call for `delay`, like a login in progress.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue a result for the next unanswered call.
    pub fn push_result(&self, result: Result<SessionToken, AuthError>) {
        self.queued.lock().push_back(result);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<AcquireRequest> {
        self.requests.lock().clone()
    }
}

impl TokenAcquirer for MockTokenAcquirer {
    fn acquire(&self, request: &AcquireRequest) -> Result<SessionToken, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        if let Some(result) = self.queued.lock().pop_front() {
            return result;
        }

        self.fallback.clone().ok_or_else(|| AuthError::failure("mock acquirer has no token"))
    }
}

/// Interaction recorded by [`ScriptedSurface`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Open(String),
    SubmitLogin { email: String },
    ClickAllow,
    Close,
}

/// Authorization surface that replays a fixed sequence of URLs
///
/// Each `current_url` call takes the next scripted URL; the last one repeats
/// forever. Every interaction is recorded.
#[derive(Debug, Default)]
pub struct ScriptedSurface {
    urls: Mutex<VecDeque<String>>,
    login_form: bool,
    allow_button: bool,
    open_failure: Option<String>,
    close_failure: Option<String>,
    events: Mutex<Vec<SurfaceEvent>>,
}

impl ScriptedSurface {
    pub fn new<I, U>(urls: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<String>,
    {
        Self { urls: Mutex::new(urls.into_iter().map(Into::into).collect()), ..Self::default() }
    }

    #[must_use]
    pub fn with_login_form(mut self) -> Self {
        self.login_form = true;
        self
    }

    #[must_use]
    pub fn with_allow_button(mut self) -> Self {
        self.allow_button = true;
        self
    }

    /// Make `open` fail with `message`.
    #[must_use]
    pub fn failing_open(mut self, message: impl Into<String>) -> Self {
        self.open_failure = Some(message.into());
        self
    }

    /// Make `close` fail with `message`.
    #[must_use]
    pub fn failing_close(mut self, message: impl Into<String>) -> Self {
        self.close_failure = Some(message.into());
        self
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().clone()
    }

    pub fn was_closed(&self) -> bool {
        self.events.lock().contains(&SurfaceEvent::Close)
    }

    fn record(&self, event: SurfaceEvent) {
        self.events.lock().push(event);
    }
}

impl AuthorizationSurface for ScriptedSurface {
    fn open(&self, url: &str) -> Result<(), AuthError> {
        self.record(SurfaceEvent::Open(url.to_string()));
        match &self.open_failure {
            Some(message) => Err(AuthError::failure(message.clone())),
            None => Ok(()),
        }
    }

    fn current_url(&self) -> Result<String, AuthError> {
        let mut urls = self.urls.lock();
        let url = if urls.len() > 1 { urls.pop_front() } else { urls.front().cloned() };
        url.ok_or_else(|| AuthError::failure("surface has no page loaded"))
    }

    fn has_login_form(&self) -> Result<bool, AuthError> {
        Ok(self.login_form)
    }

    fn submit_login(&self, credentials: &Credentials) -> Result<(), AuthError> {
        self.record(SurfaceEvent::SubmitLogin { email: credentials.email.clone() });
        Ok(())
    }

    fn has_allow_button(&self) -> Result<bool, AuthError> {
        Ok(self.allow_button)
    }

    fn click_allow(&self) -> Result<(), AuthError> {
        self.record(SurfaceEvent::ClickAllow);
        Ok(())
    }

    fn close(&self) -> Result<(), AuthError> {
        self.record(SurfaceEvent::Close);
        match &self.close_failure {
            Some(message) => Err(AuthError::failure(message.clone())),
            None => Ok(()),
        }
    }
}
