//! API-specific error types
//!
//! Provides error classification for API calls with stable category labels
//! for logging.

use thiserror::Error;
use vknet_common::auth::AuthError;
use vknet_domain::VkNetError;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Caller supplied an unusable argument
    InvalidArgument,
    /// HTTP call failed, returned a non-success status or an empty body
    Transport,
    /// The remote service answered with an error document
    RemoteApi,
    /// Response could not be decoded into the requested shape
    Decode,
    /// Session acquisition failed
    Auth,
    /// Client could not be configured
    Config,
}

impl ApiErrorCategory {
    /// Stable label for structured logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::Transport => "transport",
            Self::RemoteApi => "remote_api",
            Self::Decode => "decode",
            Self::Auth => "auth",
            Self::Config => "config",
        }
    }
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Error response received (code {code}): {message}")]
    RemoteApi { code: i32, message: String },

    #[error("Unknown error response: {raw}")]
    UnknownRemote { raw: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::InvalidArgument(_) => ApiErrorCategory::InvalidArgument,
            Self::Transport(_) => ApiErrorCategory::Transport,
            Self::RemoteApi { .. } | Self::UnknownRemote { .. } => ApiErrorCategory::RemoteApi,
            Self::Decode(_) => ApiErrorCategory::Decode,
            Self::Auth(_) => ApiErrorCategory::Auth,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Error code of a remote error document, if this is one.
    pub fn remote_code(&self) -> Option<i32> {
        match self {
            Self::RemoteApi { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Convert from the domain error to ApiError
impl From<VkNetError> for ApiError {
    fn from(err: VkNetError) -> Self {
        match err {
            VkNetError::Network(msg) | VkNetError::Internal(msg) => Self::Transport(msg),
            VkNetError::InvalidInput(msg) => Self::InvalidArgument(msg),
            VkNetError::Config(msg) => Self::Config(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ApiError::InvalidArgument("test".to_string()).category(),
            ApiErrorCategory::InvalidArgument
        );
        assert_eq!(
            ApiError::UnknownRemote { raw: "<error/>".to_string() }.category(),
            ApiErrorCategory::RemoteApi
        );
        assert_eq!(ApiError::from(AuthError::Cancelled).category(), ApiErrorCategory::Auth);
        assert_eq!(ApiErrorCategory::Decode.as_str(), "decode");
    }

    #[test]
    fn test_domain_error_conversion() {
        assert!(matches!(
            ApiError::from(VkNetError::Network("refused".into())),
            ApiError::Transport(_)
        ));
        assert!(matches!(ApiError::from(VkNetError::Config("bad".into())), ApiError::Config(_)));
    }

    #[test]
    fn test_remote_error_display() {
        let err = ApiError::RemoteApi { code: 5, message: "User authorization failed".into() };
        assert_eq!(err.remote_code(), Some(5));
        assert_eq!(err.to_string(), "Error response received (code 5): User authorization failed");
    }
}
