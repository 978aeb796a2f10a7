//! Error types used throughout the application

use thiserror::Error;

/// Main domain error type for VKNet
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VkNetError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for VKNet domain operations
pub type Result<T> = std::result::Result<T, VkNetError>;
