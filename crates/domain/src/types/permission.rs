//! Permission scopes requested during authorization

use crate::impl_wire_name_conversions;

/// Access scope an application asks the user to grant.
///
/// Scopes are sent comma-joined in the `scope` parameter of the
/// authorization URL. `Offline` yields a token that never expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Notify,
    Friends,
    Photos,
    Audio,
    Video,
    Docs,
    Notes,
    Pages,
    Offers,
    Questions,
    Wall,
    Groups,
    Messages,
    Notifications,
    Ads,
    Offline,
    NoHttps,
}

impl_wire_name_conversions!(Permission {
    Notify => "notify",
    Friends => "friends",
    Photos => "photos",
    Audio => "audio",
    Video => "video",
    Docs => "docs",
    Notes => "notes",
    Pages => "pages",
    Offers => "offers",
    Questions => "questions",
    Wall => "wall",
    Groups => "groups",
    Messages => "messages",
    Notifications => "notifications",
    Ads => "ads",
    Offline => "offline",
    NoHttps => "nohttps",
});

impl Permission {
    /// Join scopes into the comma-separated form used on the wire.
    #[must_use]
    pub fn join(scopes: &[Self]) -> String {
        scopes.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
    }
}
