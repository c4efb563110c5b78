//! # Retry policy for bounded state waits.
//!
//! [`RetryPolicy`] controls one wait point of the session lifecycle: how
//! often to re-check the facade's state, how many checks to spend, and what
//! the caller should do once the budget is exhausted.
//!
//! Each wait point carries its own independent policy. Deployed variants of
//! the original application differ (10×1s fail-fast vs 30×1s fail-fast for
//! service-up; 15×1s warn-and-continue vs 30×1s fail-fast for connectivity),
//! so both knobs are configuration, never constants.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use v2x_session::{OnExhaustion, RetryPolicy};
//!
//! let service_up = RetryPolicy::new(Duration::from_secs(1), 10, OnExhaustion::FailFast);
//! assert_eq!(service_up.max_attempts, 10);
//!
//! let connectivity = RetryPolicy::new(Duration::from_secs(1), 15, OnExhaustion::WarnAndContinue);
//! assert!(connectivity.validate().is_ok());
//! ```

use std::time::Duration;

/// Caller reaction once a wait budget is exhausted.
///
/// The policy only shapes the caller's reaction; the poller itself always
/// terminates after `max_attempts` checks either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnExhaustion {
    /// Exhaustion is fatal: abort the forward lifecycle.
    FailFast,
    /// Exhaustion is logged as a warning and the lifecycle proceeds as if
    /// the wait had succeeded.
    WarnAndContinue,
}

/// Bounded-retry policy for one wait point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay between consecutive state checks. Must be positive.
    pub interval: Duration,
    /// Maximum number of state checks. Must be positive.
    pub max_attempts: u32,
    /// Caller reaction on budget exhaustion.
    pub on_exhaustion: OnExhaustion,
}

impl RetryPolicy {
    /// Creates a policy with explicit parameters.
    pub fn new(interval: Duration, max_attempts: u32, on_exhaustion: OnExhaustion) -> Self {
        Self {
            interval,
            max_attempts,
            on_exhaustion,
        }
    }

    /// Checks that the policy describes a bounded, non-degenerate wait.
    ///
    /// Returns the offending field name on failure so configuration
    /// validation can report it verbatim.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.interval.is_zero() {
            return Err("interval must be positive");
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be positive");
        }
        Ok(())
    }

    /// Upper bound on how long the wait can take.
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}
