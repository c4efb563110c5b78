//! Wait policies.
//!
//! This module groups the knobs that control **how long** the orchestrator
//! waits for a facade state and **what happens** when it stops waiting.
//!
//! ## Contents
//! - [`RetryPolicy`] interval / budget for one wait point
//! - [`OnExhaustion`] caller reaction on budget exhaustion (fail-fast vs warn)
//!
//! ## Quick wiring
//! ```text
//! SessionConfig { service_up: RetryPolicy, connectivity: RetryPolicy }
//!      └─► poller::await_state uses:
//!           - interval/max_attempts to bound the poll
//!           - on_exhaustion is read by the orchestrator, not the poller
//! ```

mod retry;

pub use retry::{OnExhaustion, RetryPolicy};
