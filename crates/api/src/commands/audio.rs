//! Audio methods

use std::sync::Arc;

use vknet_domain::{Audio, AudioListResponse, ListDocument};
use vknet_infra::{ApiClient, ApiError, ApiRequest, ListWrapper};

/// Audio API wrapper
#[derive(Clone)]
pub struct AudioCommands {
    client: Arc<ApiClient>,
}

impl AudioCommands {
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Search the audio catalogue (`audio.search`).
    ///
    /// # Errors
    /// [`ApiError::InvalidArgument`] for a blank query, otherwise any
    /// [`ApiError`] from the call.
    pub fn search(&self, query: &str, count: u32) -> Result<Vec<Audio>, ApiError> {
        if query.trim().is_empty() {
            return Err(ApiError::InvalidArgument("search query cannot be empty".to_string()));
        }

        let request =
            ApiRequest::new("audio.search").with_param("q", query).with_param("count", count);
        Ok(self.client.call::<ListWrapper<AudioListResponse>>(&request)?.into_items())
    }
}
