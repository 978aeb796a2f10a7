//! Mock clock for deterministic login-flow tests
//!
//! # Examples
//!
//! ```ignore
//! use std::time::Duration;
//!
//! use vknet_common::testing::MockClock;
//! use vknet_common::time::Clock;
//!
//! let clock = MockClock::new();
//! let start = clock.now();
//! clock.sleep(Duration::from_secs(3));
//! assert_eq!(clock.now().duration_since(start), Duration::from_secs(3));
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

use crate::time::Clock;

/// Mock clock for deterministic testing
///
/// `sleep` advances the clock instead of blocking, so a polling loop runs
/// instantly while still observing the time it would have taken. Clones
/// share the same elapsed time.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    base_utc: DateTime<Utc>,
    elapsed: Arc<Mutex<Duration>>,
    sleeps: Arc<Mutex<usize>>,
}

impl MockClock {
    /// Create a new mock clock starting at the current real time.
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Create a mock clock whose wall time starts at `base_utc`.
    pub fn starting_at(base_utc: DateTime<Utc>) -> Self {
        Self {
            start: Instant::now(),
            base_utc,
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
            sleeps: Arc::new(Mutex::new(0)),
        }
    }

    /// Simulate time passing without actually waiting.
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }

    /// How much time has been simulated since the clock was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }

    /// Number of `sleep` calls observed.
    #[must_use]
    pub fn sleep_count(&self) -> usize {
        *self.sleeps.lock()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        let elapsed = TimeDelta::from_std(self.elapsed()).unwrap_or(TimeDelta::MAX);
        self.base_utc.checked_add_signed(elapsed).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn sleep(&self, duration: Duration) {
        *self.sleeps.lock() += 1;
        self.advance(duration);
    }
}
