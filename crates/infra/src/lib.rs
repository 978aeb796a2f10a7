//! # VKNet Infrastructure
//!
//! Infrastructure implementations for the VK API client.
//!
//! This crate contains:
//! - HTTP transport (blocking reqwest)
//! - The API client: request building, session handling, response decoding
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Implements the transport seam used by the API client
//! - Depends on `vknet-domain` and `vknet-common`
//! - Contains all "impure" code (I/O, network)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used items
pub use api::{
    ApiClient, ApiClientBuilder, ApiClientConfig, ApiError, ApiErrorCategory, ApiRequest,
    IntegerList, ListWrapper, RawDocument, ResponseDecoder, ResponseShape, SingleObject,
    XmlDocument, XmlElement,
};
pub use http::{HttpClient, HttpClientBuilder, HttpResponse, HttpTransport};
