//! # Session lifecycle phases.
//!
//! [`SessionPhase`] tracks where the orchestrator is in its forward
//! sequence. The orchestrator is the single writer; cleanup reads the phase
//! and the started-stream bookkeeping to decide what still needs stopping.
//!
//! ## Phase machine
//! ```text
//! Init → Configured → ServiceStarting → ServiceUp → ConnectivityWait
//!      → Subscribed → SubservicesRunning → SteadyState → Terminating → Stopped
//!
//! Error (pseudo-phase): reachable from any non-terminal phase on fatal
//! failure; always followed by Terminating.
//! ```

use std::fmt;

/// Current lifecycle phase of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Fresh session, nothing validated yet.
    Init,
    /// Configuration validated.
    Configured,
    /// Transport start requested; waiting for the service to come up.
    ServiceStarting,
    /// Transport service up and running.
    ServiceUp,
    /// Subscriptions registered; waiting for broker connectivity.
    ConnectivityWait,
    /// Connectivity wait concluded (confirmed or warned past).
    Subscribed,
    /// Enabled sub-services started.
    SubservicesRunning,
    /// Holding in steady state until a stop signal.
    SteadyState,
    /// Fatal failure; cleanup pending.
    Error,
    /// Best-effort cleanup in progress.
    Terminating,
    /// Terminal phase; everything stopped.
    Stopped,
}

impl SessionPhase {
    /// True once no further forward transition can happen.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Stopped)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionPhase::Init => "init",
            SessionPhase::Configured => "configured",
            SessionPhase::ServiceStarting => "service_starting",
            SessionPhase::ServiceUp => "service_up",
            SessionPhase::ConnectivityWait => "connectivity_wait",
            SessionPhase::Subscribed => "subscribed",
            SessionPhase::SubservicesRunning => "subservices_running",
            SessionPhase::SteadyState => "steady_state",
            SessionPhase::Error => "error",
            SessionPhase::Terminating => "terminating",
            SessionPhase::Stopped => "stopped",
        };
        f.write_str(s)
    }
}
