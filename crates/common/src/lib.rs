//! Common building blocks shared across VKNet crates.
//!
//! # Safety and Quality
//!
//! This crate enforces the same safety and quality standards as the rest of
//! the workspace: no unsafe code, no panics on the request path.
//!
//! # Modules
//!
//! - [`auth`]: session tokens, the acquisition contract and the redirect-driven
//!   OAuth implicit-grant flow
//! - [`time`]: clock abstraction used by the login flow
//! - `testing` (feature `test-utils`): mock clock, mock acquirer and a
//!   scripted authorization surface

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use auth::{
    AcquireRequest, AuthError, AuthorizationSurface, Credentials, RedirectFlowAcquirer,
    SessionToken, StaticTokenAcquirer, TokenAcquirer,
};
pub use time::{Clock, SystemClock};
