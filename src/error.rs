//! Error types used by the session core.
//!
//! This module defines two main error types:
//!
//! - [`SessionError`] — errors raised by the session lifecycle itself.
//! - [`FacadeError`] — errors raised by calls into the vendor facade.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics.
//!
//! ## Propagation policy
//! Errors on the forward lifecycle path are fatal: they abort the remaining
//! transitions and jump to cleanup. Errors during cleanup are swallowed
//! per-step (logged, never re-raised) so a failed stop call does not prevent
//! the remaining stop calls from running. Listener failures are not errors
//! of the pipeline at all: they are caught, logged, and delivery continues.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by calls into the vendor facade.
///
/// The facade is an opaque dependency; its failures surface as an opaque
/// message plus the operation that was attempted (attached by the caller
/// via [`SessionError::Facade`]).
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct FacadeError {
    /// Underlying failure description as reported by the facade.
    pub message: String,
}

impl FacadeError {
    /// Creates a facade error from any displayable cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// # Errors produced by the session lifecycle.
///
/// These represent failures of the orchestration itself: invalid
/// configuration, an exhausted wait budget, a failed facade call, or a
/// delivery pipeline that did not drain within its grace period.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SessionError {
    /// Required configuration is missing or invalid.
    ///
    /// Fatal before any facade interaction.
    #[error("invalid configuration: {reason}")]
    Config {
        /// What is missing or invalid.
        reason: String,
    },

    /// A bounded wait exhausted its retry budget without reaching the
    /// target state.
    ///
    /// Fatal under `OnExhaustion::FailFast`; logged-and-continued under
    /// `OnExhaustion::WarnAndContinue`.
    #[error("{what} not reached after {attempts} attempts ({interval:?} apart)")]
    WaitExhausted {
        /// Which wait point exhausted (e.g. "service up").
        what: &'static str,
        /// Number of state checks performed.
        attempts: u32,
        /// Interval between checks.
        interval: Duration,
    },

    /// A call into the facade failed.
    ///
    /// Fatal on the forward path; caught and logged during cleanup.
    #[error("facade operation '{op}' failed: {source}")]
    Facade {
        /// Name of the facade operation that failed.
        op: &'static str,
        /// Underlying facade error.
        source: FacadeError,
    },

    /// The delivery pipeline consumer did not terminate within the shutdown
    /// grace period and was abandoned; queued envelopes were discarded.
    #[error("event delivery did not drain within {grace:?}; consumer abandoned")]
    DeliveryStalled {
        /// The configured grace duration.
        grace: Duration,
    },
}

impl SessionError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use v2x_session::SessionError;
    ///
    /// let err = SessionError::Config { reason: "application id is empty".into() };
    /// assert_eq!(err.as_label(), "config_invalid");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SessionError::Config { .. } => "config_invalid",
            SessionError::WaitExhausted { .. } => "wait_exhausted",
            SessionError::Facade { .. } => "facade_failed",
            SessionError::DeliveryStalled { .. } => "delivery_stalled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SessionError::Config { reason } => format!("config: {reason}"),
            SessionError::WaitExhausted {
                what,
                attempts,
                interval,
            } => {
                format!("wait for {what} exhausted: attempts={attempts} interval={interval:?}")
            }
            SessionError::Facade { op, source } => format!("facade {op}: {source}"),
            SessionError::DeliveryStalled { grace } => {
                format!("delivery stalled; grace={grace:?}")
            }
        }
    }

    /// Wraps a facade error with the operation name that produced it.
    pub(crate) fn facade(op: &'static str, source: FacadeError) -> Self {
        SessionError::Facade { op, source }
    }
}
