//! Time abstraction for testability
//!
//! The login flow measures its own duration and sleeps between polls. Both go
//! through [`Clock`] so tests can run the flow without real time passing.
//!
//! # Examples
//!
//! ```
//! use vknet_common::time::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! let start = clock.now();
//! assert!(clock.now() >= start);
//! ```

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Trait for time operations to enable testing
pub trait Clock: Send + Sync {
    /// Monotonic instant, for measuring elapsed time.
    fn now(&self) -> Instant;

    /// Wall clock time, for computing token expiry.
    fn utc_now(&self) -> DateTime<Utc>;

    /// Block the current thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Real system clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_sleeps() {
        let clock = SystemClock;
        let start = clock.now();
        clock.sleep(Duration::from_millis(5));
        assert!(clock.now().duration_since(start) >= Duration::from_millis(5));
    }
}
