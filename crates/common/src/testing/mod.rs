//! Testing utilities and helpers
//!
//! - **[`mocks`]**: mock token acquirer and a scripted authorization surface
//! - **[`time`]**: mock clock whose `sleep` advances time instantly
//!
//! ## Usage
//!
//! ```ignore
//! use std::time::Duration;
//!
//! use vknet_common::testing::MockClock;
//! use vknet_common::time::Clock;
//!
//! let clock = MockClock::new();
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(clock.elapsed(), Duration::from_secs(5));
//! ```

pub mod mocks;
pub mod time;

// Re-export commonly used items
pub use mocks::{MockTokenAcquirer, ScriptedSurface, SurfaceEvent};
pub use time::MockClock;
