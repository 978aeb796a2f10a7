//! API method request

use std::fmt::Display;

/// A remote method name plus its parameters.
///
/// Parameters keep insertion order; setting an existing key replaces its
/// value in place.
///
/// ```
/// use vknet_infra::api::ApiRequest;
///
/// let request = ApiRequest::new("friends.get").with_param("uid", 1).with_param("fields", "sex");
/// assert_eq!(request.query_prefix(), "uid=1&fields=sex&");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiRequest {
    method_name: String,
    parameters: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method_name: impl Into<String>) -> Self {
        Self { method_name: method_name.into(), parameters: Vec::new() }
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.set_param(key, value);
        self
    }

    /// Add the parameter only when `value` is `Some`.
    #[must_use]
    pub fn with_optional_param<V: Display>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with_param(key, value),
            None => self,
        }
    }

    pub fn set_param(&mut self, key: impl Into<String>, value: impl Display) {
        let key = key.into();
        let value = value.to_string();
        match self.parameters.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.parameters.push((key, value)),
        }
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.parameters.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// `k1=v1&k2=v2&` with values percent-encoded, or an empty string.
    pub fn query_prefix(&self) -> String {
        self.parameters
            .iter()
            .map(|(k, v)| format!("{k}={}&", urlencoding::encode(v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_and_replaces_in_place() {
        let request = ApiRequest::new("messages.get")
            .with_param("out", 0)
            .with_param("count", 20)
            .with_param("out", 1);

        assert_eq!(
            request.parameters(),
            &[("out".to_string(), "1".to_string()), ("count".to_string(), "20".to_string())]
        );
    }

    #[test]
    fn encodes_values() {
        let request = ApiRequest::new("audio.search").with_param("q", "rock & roll=1");
        assert_eq!(request.query_prefix(), "q=rock%20%26%20roll%3D1&");
    }

    #[test]
    fn empty_parameters_yield_empty_prefix() {
        assert_eq!(ApiRequest::new("getUserSettings").query_prefix(), "");
    }

    #[test]
    fn optional_params_are_skipped() {
        let request = ApiRequest::new("friends.get").with_optional_param("uid", None::<u32>);
        assert!(request.param("uid").is_none());
    }
}
