//! Session core: lifecycle orchestration.
//!
//! This module contains the orchestrator that sequences the facade through
//! a complete session. The public API from this module is
//! [`SessionOrchestrator`] plus the [`SessionPhase`] it reports.
//!
//! Internal modules:
//! - [`orchestrator`]: forward sequence, steady-state hold, best-effort cleanup;
//! - [`phase`]: the lifecycle phase machine;
//! - [`signal`]: cross-platform OS stop-signal handling.

mod orchestrator;
mod phase;
mod signal;

pub use orchestrator::SessionOrchestrator;
pub use phase::SessionPhase;
