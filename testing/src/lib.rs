//! # Relief Ops Testing
//!
//! Testing utilities and helpers for the Relief Ops client architecture.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Effect assertions and an effect driver for reducer-level tests
//!
//! ## Example
//!
//! ```ignore
//! use relief_ops_testing::{test_clock, ReducerTest};
//!
//! ReducerTest::new(SessionReducer::new())
//!     .with_env(test_environment())
//!     .given_state(SessionState::default())
//!     .when_action(SessionAction::Hydrate)
//!     .then_state(|state| assert!(state.is_loading()))
//!     .run();
//! ```

use chrono::{DateTime, TimeZone, Utc};
use relief_ops_core::environment::Clock;

pub mod reducer_test;

/// Deterministic implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, TimeZone, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use relief_ops_testing::mocks::FixedClock;
    /// use relief_ops_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone, Copy)]
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
        FixedClock::new(
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

/// Install a compact `tracing` subscriber for test output.
///
/// Honors `RUST_LOG`; safe to call from every test since only the first
/// call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
