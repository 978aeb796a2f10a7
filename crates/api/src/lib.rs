//! # VKNet App
//!
//! Application layer - method wrappers and the command-line entry point.
//!
//! This crate contains:
//! - Method wrappers grouped by API section (`Vk`)
//! - Application context (wiring from configuration)
//! - Terminal authorization surface
//! - Tracing setup
//!
//! ## Architecture
//! - Depends on `domain`, `common`, and `infra`
//! - Chooses the session acquisition strategy from configuration
//! - Provides the `vknet` binary

pub mod adapters;
pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
