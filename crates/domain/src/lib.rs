//! # VKNet Domain
//!
//! Domain types and models for the VK API client.
//!
//! This crate contains:
//! - API entity types (users, messages, audio tracks, groups)
//! - List-wrapper and error response documents
//! - Domain error types and Result definitions
//! - Configuration structures
//! - API constants
//!
//! ## Architecture
//! - No dependencies on other VKNet crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
