//! Response documents
//!
//! List methods answer with a root element flagged `list="true"` holding an
//! optional `count` and a run of item elements:
//!
//! ```xml
//! <response list="true">
//!   <count>2</count>
//!   <user>...</user>
//!   <user>...</user>
//! </response>
//! ```
//!
//! Failed calls answer with an `error` root instead.

use serde::{Deserialize, Serialize};

use super::{Audio, Counters, Group, Lyrics, Message, User};
use crate::constants::{ERROR_ELEMENT, RESPONSE_ELEMENT};

/// Types read from one named XML element.
///
/// The decoder refuses to read a type from an element with another name.
pub trait ResponseElement {
    const ELEMENT: &'static str;
}

macro_rules! response_element {
    ($($ty:ty => $element:expr),+ $(,)?) => {
        $(impl ResponseElement for $ty {
            const ELEMENT: &'static str = $element;
        })+
    };
}

response_element!(
    User => "user",
    Counters => "counters",
    Message => "message",
    Audio => "audio",
    Lyrics => "lyrics",
    Group => "group",
    ErrorResponse => ERROR_ELEMENT,
);

/// Common view over the list-wrapper documents.
pub trait ListDocument {
    type Item: ResponseElement;

    /// `count` element, or 0 when the method omits it.
    fn total(&self) -> u32;

    fn items(&self) -> &[Self::Item];

    fn into_items(self) -> Vec<Self::Item>;
}

macro_rules! list_response {
    ($(#[$meta:meta])* $name:ident, $item:ty, $element:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
        pub struct $name {
            #[serde(rename = "@list", default)]
            pub is_list: bool,
            #[serde(rename = "count", default)]
            pub total: u32,
            #[serde(rename = $element, default)]
            pub items: Vec<$item>,
        }

        impl ResponseElement for $name {
            const ELEMENT: &'static str = RESPONSE_ELEMENT;
        }

        impl ListDocument for $name {
            type Item = $item;

            fn total(&self) -> u32 {
                self.total
            }

            fn items(&self) -> &[Self::Item] {
                &self.items
            }

            fn into_items(self) -> Vec<Self::Item> {
                self.items
            }
        }
    };
}

list_response!(
    /// `<user>` items (`getProfiles`, `friends.get` with fields)
    UserListResponse,
    User,
    "user"
);

list_response!(
    /// `<message>` items (`messages.get`)
    MessageListResponse,
    Message,
    "message"
);

list_response!(
    /// `<audio>` items (`audio.search`, `audio.get`)
    AudioListResponse,
    Audio,
    "audio"
);

list_response!(
    /// `<group>` items (`getGroupsFull`)
    GroupListResponse,
    Group,
    "group"
);

/// Body of an `<error>` root element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error_code: i32,
    pub error_msg: String,
}
