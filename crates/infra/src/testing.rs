//! Transport stub for tests
//!
//! [`RecordingTransport`] answers from a queue of canned responses and keeps
//! every requested URL, so tests can check call counts and URL layout without
//! a network.

#![allow(clippy::missing_panics_doc)]

use std::collections::VecDeque;

use parking_lot::Mutex;
use vknet_domain::VkNetError;

use crate::http::{HttpResponse, HttpTransport};

/// Transport that replays queued responses and records requested URLs
///
/// When the queue is empty, calls fail with [`VkNetError::Network`].
///
/// # Examples
///
/// ```ignore
/// use vknet_infra::http::HttpTransport;
/// use vknet_infra::testing::RecordingTransport;
///
/// let transport = RecordingTransport::new();
/// transport.push_ok("<response>1</response>");
///
/// assert_eq!(transport.get("http://x/method/a.xml").unwrap().body, "<response>1</response>");
/// assert!(transport.get("http://x/method/b.xml").is_err());
/// assert_eq!(transport.calls(), 2);
/// ```
#[derive(Debug, Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, VkNetError>>>,
    urls: Mutex<Vec<String>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `200 OK` with `body`.
    pub fn push_ok(&self, body: impl Into<String>) {
        self.push_response(200, body);
    }

    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.responses.lock().push_back(Ok(HttpResponse { status, body: body.into() }));
    }

    pub fn push_error(&self, error: VkNetError) {
        self.responses.lock().push_back(Err(error));
    }

    pub fn calls(&self) -> usize {
        self.urls.lock().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }
}

impl HttpTransport for RecordingTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, VkNetError> {
        self.urls.lock().push(url.to_string());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(VkNetError::Network("no scripted response".to_string())))
    }
}
