//! # Bounded-retry state polling.
//!
//! [`await_state`] blocks the calling task until a read-only predicate
//! reaches a target value or the [`RetryPolicy`] budget is exhausted.
//!
//! ## Flow
//! ```text
//! loop (attempt = 1..=max_attempts) {
//!   ├─► read current state
//!   ├─► state == target ──► Ok(Polled { attempts, elapsed })
//!   ├─► budget spent    ──► Err(PollError::Exhausted)
//!   └─► cancellable sleep(interval)
//!            └─ token cancelled ──► Err(PollError::Canceled)
//! }
//! ```
//!
//! ## Rules
//! - The predicate must be read-only and safe to call repeatedly.
//! - Exactly `max_attempts` checks, at most `max_attempts − 1` sleeps:
//!   success on attempt *k* takes ≈ (k−1)×interval.
//! - Termination after exhaustion does not depend on
//!   [`OnExhaustion`](crate::OnExhaustion); that flag only shapes the
//!   caller's reaction.
//! - Cancellation aborts the poll within one interval.

use std::fmt::Debug;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::policies::RetryPolicy;

/// Successful poll outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Polled {
    /// Number of state checks spent, 1-based.
    pub attempts: u32,
    /// Wall time elapsed between the first check and the match.
    pub elapsed: Duration,
}

/// Unsuccessful poll outcome.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollError {
    /// The retry budget was spent without observing the target state.
    #[error("target state not reached after {attempts} attempts")]
    Exhausted {
        /// Number of state checks performed.
        attempts: u32,
    },

    /// The session was torn down while the poll was sleeping.
    #[error("poll cancelled")]
    Canceled,
}

/// Polls `read()` until it returns `target` or `policy` is exhausted.
///
/// `what` names the wait point in logs ("service up", "connectivity").
/// `cancel` is the session teardown token; cancelling it ends the poll
/// promptly instead of running the full budget.
pub async fn await_state<S, F>(
    what: &'static str,
    read: F,
    target: S,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<Polled, PollError>
where
    S: PartialEq + Debug,
    F: Fn() -> S,
{
    let started = Instant::now();

    for attempt in 1..=policy.max_attempts {
        let current = read();
        if current == target {
            let polled = Polled {
                attempts: attempt,
                elapsed: started.elapsed(),
            };
            tracing::debug!(
                wait = what,
                attempts = polled.attempts,
                elapsed_ms = polled.elapsed.as_millis() as u64,
                "target state reached"
            );
            return Ok(polled);
        }

        tracing::debug!(
            wait = what,
            attempt,
            max_attempts = policy.max_attempts,
            state = ?current,
            "state not yet at target"
        );

        // No trailing sleep after the final check.
        if attempt == policy.max_attempts {
            break;
        }

        let sleep = time::sleep(policy.interval);
        tokio::pin!(sleep);
        tokio::select! {
            _ = &mut sleep => {}
            _ = cancel.cancelled() => {
                tracing::debug!(wait = what, attempt, "poll cancelled during sleep");
                return Err(PollError::Canceled);
            }
        }
    }

    Err(PollError::Exhausted {
        attempts: policy.max_attempts,
    })
}
