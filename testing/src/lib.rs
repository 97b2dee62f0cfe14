//! # Seatmap Testing
//!
//! Testing utilities for reducers built on `seatmap-core`.
//!
//! This crate provides:
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Effect assertion helpers
//! - A deterministic [`FixedClock`]
//!
//! ## Example
//!
//! ```ignore
//! use seatmap_testing::{assertions, test_clock, ReducerTest};
//!
//! ReducerTest::new(BookingReducer::new())
//!     .with_env(BookingEnvironment::new(Arc::new(test_clock())))
//!     .given_state(BookingState::new())
//!     .when_action(add_screen_command)
//!     .then_state(|state| assert_eq!(state.registry.len(), 1))
//!     .then_effects(|effects| assertions::assert_effects_count(effects, 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use seatmap_core::environment::Clock;


pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use seatmap_testing::mocks::FixedClock;
    /// use seatmap_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        // Unix timestamp of 2025-01-01T00:00:00Z
        FixedClock::new(DateTime::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }
}

pub use mocks::{test_clock, FixedClock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(time1.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }
}
