//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use vknet_domain::VkNetError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub VkNetError);

impl From<InfraError> for VkNetError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<VkNetError> for InfraError {
    fn from(value: VkNetError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → VkNetError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(err: HttpError) -> Self {
        let error = if err.is_builder() {
            VkNetError::Config(format!("invalid HTTP client configuration: {err}"))
        } else if err.is_timeout() {
            VkNetError::Network(format!("request timed out: {err}"))
        } else if err.is_connect() {
            VkNetError::Network(format!("connection failed: {err}"))
        } else if err.is_body() || err.is_decode() {
            VkNetError::Network(format!("failed to read response body: {err}"))
        } else {
            VkNetError::Network(err.to_string())
        };
        InfraError(error)
    }
}
