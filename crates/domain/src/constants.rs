//! API constants
//!
//! Centralized location for the endpoints and limits shared by the client
//! and the authorization flow.

/// Base URL the `method/<name>.xml` paths are appended to.
pub const DEFAULT_API_BASE_URL: &str = "https://api.vk.com";

/// Host serving `/oauth/authorize` and the blank redirect page.
pub const DEFAULT_OAUTH_HOST: &str = "oauth.vk.com";

/// Response format suffix appended to every method name.
pub const RESPONSE_FORMAT: &str = "xml";

/// Query parameter carrying the session token; always serialized last.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

// Transport defaults
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("vknet/", env!("CARGO_PKG_VERSION"));

// Interactive login defaults
pub const DEFAULT_LOGIN_POLL_INTERVAL_MS: u64 = 3_000;

/// Number of messages fetched by the "unread" shortcut.
pub const UNREAD_MESSAGES_PAGE: u32 = 100;

// Response document elements
pub const RESPONSE_ELEMENT: &str = "response";
pub const ERROR_ELEMENT: &str = "error";
pub const LIST_COUNT_ELEMENT: &str = "count";
