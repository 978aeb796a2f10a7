//! API entity types and response documents
//!
//! Field names follow the XML element names of the remote API; every field
//! defaults when the element is missing because the set of returned fields
//! depends on the request.

pub mod audio;
pub mod group;
pub mod message;
pub mod permission;
pub mod responses;
pub mod user;

pub use audio::{Audio, Lyrics};
pub use group::Group;
pub use message::{Message, MessageDirection};
pub use permission::Permission;
pub use responses::{
    AudioListResponse, ErrorResponse, GroupListResponse, ListDocument, MessageListResponse,
    ResponseElement, UserListResponse,
};
pub use user::{Counters, Sex, User};

/// Interpret a `0`/`1` flag element.
#[inline]
pub(crate) const fn flag(raw: u8) -> bool {
    raw == 1
}
