//! Private message methods

use std::ops::BitOr;
use std::sync::Arc;

use vknet_domain::constants::UNREAD_MESSAGES_PAGE;
use vknet_domain::{ListDocument, Message, MessageDirection, MessageListResponse};
use vknet_infra::{ApiClient, ApiError, ApiRequest, ListWrapper};

/// Server-side filter flags for `messages.get`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MessageFilter(u8);

impl MessageFilter {
    pub const NONE: Self = Self(0);
    pub const UNREAD: Self = Self(1);
    pub const NOT_FROM_CHAT: Self = Self(2);
    pub const FROM_FRIENDS: Self = Self(4);

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for MessageFilter {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Message API wrapper
#[derive(Clone)]
pub struct MessageCommands {
    client: Arc<ApiClient>,
}

impl MessageCommands {
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Incoming unread messages, first page.
    ///
    /// # Errors
    /// Any [`ApiError`] from session acquisition or the call.
    pub fn unread(&self) -> Result<Vec<Message>, ApiError> {
        self.list(
            MessageDirection::Incoming,
            None,
            Some(UNREAD_MESSAGES_PAGE),
            MessageFilter::UNREAD,
            Some(0),
            None,
        )
    }

    /// Messages matching the given criteria (`messages.get`).
    ///
    /// # Arguments
    /// * `offset` / `count` - paging
    /// * `filter` - omitted from the request when empty
    /// * `preview_length` - truncate bodies to this many characters; `0`
    ///   loads complete messages
    /// * `time_offset` - only messages newer than this many seconds
    ///
    /// # Errors
    /// Any [`ApiError`] from session acquisition or the call.
    pub fn list(
        &self,
        direction: MessageDirection,
        offset: Option<u32>,
        count: Option<u32>,
        filter: MessageFilter,
        preview_length: Option<u32>,
        time_offset: Option<u32>,
    ) -> Result<Vec<Message>, ApiError> {
        let filters = (!filter.is_empty()).then_some(filter.bits());

        let request = ApiRequest::new("messages.get")
            .with_param("out", direction.as_flag())
            .with_optional_param("offset", offset)
            .with_optional_param("count", count)
            .with_optional_param("filters", filters)
            .with_optional_param("preview_length", preview_length)
            .with_optional_param("time_offset", time_offset);

        Ok(self.client.call::<ListWrapper<MessageListResponse>>(&request)?.into_items())
    }
}

#[cfg(test)]
mod tests {
    use vknet_common::auth::{Permission, SessionToken};
    use vknet_common::testing::MockTokenAcquirer;
    use vknet_infra::testing::RecordingTransport;

    use super::*;

    const MESSAGES: &str = r#"<response list="true">
      <count>2</count>
      <message><mid>12</mid><uid>5</uid><date>1300000000</date><read_state>0</read_state><out>0</out><body>hi</body></message>
      <message><mid>11</mid><uid>6</uid><date>1290000000</date><read_state>0</read_state><out>0</out><body>yo</body></message>
    </response>"#;

    fn commands(transport: &Arc<RecordingTransport>) -> MessageCommands {
        let client = ApiClient::builder()
            .base_url("https://api.example.com")
            .app_id(1)
            .scopes([Permission::Messages])
            .acquirer(Arc::new(MockTokenAcquirer::new(SessionToken::new(1, "T", 0))))
            .transport(transport.clone())
            .build()
            .unwrap();
        MessageCommands::new(Arc::new(client))
    }

    #[test]
    fn unread_requests_first_incoming_page() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_ok(MESSAGES);

        let messages = commands(&transport).unread().unwrap();

        assert_eq!(messages.len(), 2);
        assert!(!messages[0].is_read());
        assert_eq!(
            transport.urls(),
            vec![
                "https://api.example.com/method/messages.get.xml?out=0&count=100&filters=1&preview_length=0&access_token=T"
            ]
        );
    }

    #[test]
    fn empty_filter_and_unset_options_are_omitted() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_ok(r#"<response list="true"><count>0</count></response>"#);

        let messages = commands(&transport)
            .list(MessageDirection::Outgoing, Some(20), None, MessageFilter::NONE, None, Some(3600))
            .unwrap();

        assert!(messages.is_empty());
        assert!(transport.urls()[0]
            .ends_with("messages.get.xml?out=1&offset=20&time_offset=3600&access_token=T"));
    }

    #[test]
    fn filters_combine() {
        let filter = MessageFilter::UNREAD | MessageFilter::FROM_FRIENDS;
        assert_eq!(filter.bits(), 5);
        assert!(!filter.is_empty());
        assert!(MessageFilter::default().is_empty());
    }
}
