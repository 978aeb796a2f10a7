//! Remote method API client
//!
//! This module turns an [`ApiRequest`] into a typed result:
//!
//! ```text
//! ApiClient::call::<Shape>(request)
//!   ├─► ensure session   (TokenAcquirer, once per missing/expired token)
//!   ├─► build URL        {base}/method/{name}.xml?{k=v&...}access_token={token}
//!   ├─► HttpTransport    one blocking GET, no retries
//!   └─► ResponseDecoder  error document → ApiError, otherwise Shape::Output
//! ```
//!
//! # Compliance
//!
//! - Structured tracing only; access tokens are redacted from logged URLs
//! - Timeout on every external call (transport level)

pub mod client;
pub mod decoder;
pub mod errors;
pub mod request;

pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use decoder::{
    IntegerList, ListWrapper, RawDocument, ResponseDecoder, ResponseShape, SingleObject,
    XmlDocument, XmlElement,
};
pub use errors::{ApiError, ApiErrorCategory};
pub use request::ApiRequest;
