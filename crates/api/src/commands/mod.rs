//! Method wrappers grouped by API section

mod audio;
mod message;
mod user;

use std::sync::Arc;

use vknet_infra::ApiClient;

pub use audio::*;
pub use message::*;
pub use user::*;

/// Container for the API section wrappers
///
/// All sections share one [`ApiClient`], and with it one session.
#[derive(Clone)]
pub struct Vk {
    pub user: UserCommands,
    pub message: MessageCommands,
    pub audio: AudioCommands,
    client: Arc<ApiClient>,
}

impl Vk {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            user: UserCommands::new(client.clone()),
            message: MessageCommands::new(client.clone()),
            audio: AudioCommands::new(client.clone()),
            client,
        }
    }

    /// Underlying client, for methods without a wrapper.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}
