//! Configuration loading and management
//!
//! This module provides utilities for loading client configuration
//! from environment variables and files.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    find_config_file, load, load_from_env, load_from_file, login_timing, parse_config,
};
