//! # Cross-platform OS stop-signal handling.
//!
//! Provides [`wait_for_stop_signal`], an async helper that completes when
//! the process receives a termination signal. Registration failures make
//! the future pend forever instead of resolving, so a broken signal handler
//! can never masquerade as a stop request.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//! - `SIGQUIT` (quit signal, often used for hard stop)
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]

/// Waits for a termination signal; never resolves on registration failure.
///
/// Each call creates independent signal listeners.
#[cfg(unix)]
pub async fn wait_for_stop_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigint, mut sigterm, mut sigquit) = match (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
        signal(SignalKind::quit()),
    ) {
        (Ok(a), Ok(b), Ok(c)) => (a, b, c),
        _ => {
            tracing::warn!("failed to register signal handlers; stop via token only");
            futures::future::pending::<()>().await;
            unreachable!()
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
}

/// Waits for a termination signal; never resolves on registration failure.
#[cfg(not(unix))]
pub async fn wait_for_stop_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("failed to register ctrl-c handler; stop via token only");
        futures::future::pending::<()>().await;
    }
}
