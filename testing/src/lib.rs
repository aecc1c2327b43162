//! # Marquee Testing
//!
//! Testing utilities and helpers for Marquee reducers.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given/When/Then builder for reducers ([`ReducerTest`])
//! - Assertion helpers for returned effects
//! - Log capture for tests that want to see `tracing` output
//!
//! ## Example
//!
//! ```ignore
//! use marquee_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(BookingReducer::new())
//!     .with_env(test_environment())
//!     .given_state(BookingState::new(catalog))
//!     .when_action(BookingAction::CancelAll { show, customer })
//!     .then_state(|state| assert!(state.last_error.is_none()))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use marquee_core::environment::Clock;

/// Given/When/Then reducer testing
pub mod reducer_test;

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
    /// use marquee_testing::mocks::FixedClock;
    /// use marquee_core::environment::Clock;
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

    /// Create a default fixed clock for tests (2024-12-01 09:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2024-12-01T09:00:00Z")
                .map_or_else(|_| DateTime::<Utc>::default(), |time| time.with_timezone(&Utc)),
        )
    }
}

/// Route `tracing` output through the test harness writer.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marquee=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock};
