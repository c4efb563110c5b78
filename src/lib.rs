//! # v2x-session
//!
//! **v2x-session** orchestrates a complete session against a vendor V2X
//! communication facade: bounded-retry state polling during startup, an
//! ordered, fault-isolated delivery pipeline for inbound traffic, and
//! first-seen classification of the node's own broadcasts.
//!
//! The facade itself (MQTT transport, TLS, message encoding) is an external
//! dependency behind the [`V2xFacade`] trait; this crate contains the part
//! with real invariants and concurrency hazards.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!             ┌────────────────────────────────────────────────────┐
//!             │  SessionOrchestrator (single control-flow task)    │
//!             │  - validates SessionConfig                         │
//!             │  - drives V2xFacade start/stop operations          │
//!             │  - poller::await_state at each wait point          │
//!             │  - best-effort reverse-order cleanup               │
//!             └──────┬──────────────────────────────┬──────────────┘
//!                    ▼                              ▼
//!         ┌─────────────────────┐       ┌────────────────────────┐
//!         │  V2xFacade (vendor) │       │  EventPipeline         │
//!         │  start/stop/state   │       │  [unbounded queue]     │
//!         │  trigger/terminate  │       │  single consumer task  │
//!         └──────────┬──────────┘       └───┬────────────────┬───┘
//!                    │ push callback        ▼                ▼
//!                    └──► EventSink   IdentityClassifier   listeners
//!                         (non-blocking)  (own/other)    (FIFO, panic-
//!                                                         isolated)
//! ```
//!
//! ### Lifecycle
//! ```text
//! run():
//!   validate config → location on → start transport
//!     → await service up        (RetryPolicy, fail-fast or warn)
//!     → register subscriptions  (before any sub-service starts)
//!     → await connectivity      (RetryPolicy, fail-fast or warn)
//!     → start CAM, then DENM    (only the enabled ones)
//!     → optional demo DENM trigger (sequence number retained)
//!     → steady-state hold       (window | stop token | OS signal)
//!   terminate():  terminate DENM → stop streams → stop transport
//!                 → drain pipeline (bounded) → location off
//! ```
//!
//! ## Features
//! | Area            | Description                                              | Key types / traits                      |
//! |-----------------|----------------------------------------------------------|-----------------------------------------|
//! | **Lifecycle**   | Drive the facade through a full session.                 | [`SessionOrchestrator`], [`SessionPhase`]|
//! | **Polling**     | Bounded, cancellable waits on facade state.              | [`RetryPolicy`], [`OnExhaustion`]       |
//! | **Delivery**    | Ordered, fault-isolated fan-out of inbound messages.     | [`EventPipeline`], [`Listen`]           |
//! | **Identity**    | Label own vs peer messages per stream.                   | [`IdentityClassifier`], [`Origin`]      |
//! | **Collaborators**| Injected facade and location provider seams.            | [`V2xFacade`], [`LocationProvider`]     |
//! | **Errors**      | Typed errors for lifecycle and facade failures.          | [`SessionError`], [`FacadeError`]       |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogListener`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use v2x_session::{FixedLocationProvider, SessionConfig, SessionOrchestrator, V2xFacade};
//!
//! # fn facade() -> Arc<dyn V2xFacade> { unimplemented!() }
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> std::process::ExitCode {
//!     let mut config = SessionConfig::default();
//!     config.application_id = std::env::var("V2X_APP_ID").unwrap_or_default();
//!     config.application_token = std::env::var("V2X_APP_TOKEN").unwrap_or_default();
//!
//!     let location = Arc::new(FixedLocationProvider::new(
//!         config.test_latitude,
//!         config.test_longitude,
//!     ));
//!
//!     let mut session = SessionOrchestrator::new(config, facade(), location);
//!     match session.run().await {
//!         Ok(()) => std::process::ExitCode::SUCCESS,
//!         Err(err) => {
//!             eprintln!("session failed: {}", err.as_message());
//!             std::process::ExitCode::FAILURE
//!         }
//!     }
//! }
//! ```

mod config;
mod error;
mod events;
mod facade;
mod listeners;
mod policies;
mod poller;
mod session;

// ---- Public re-exports ----

pub use config::SessionConfig;
pub use error::{FacadeError, SessionError};
pub use events::{
    CamData, Delivery, DenmData, EventEnvelope, EventPipeline, EventSink, IdentityClassifier,
    Listen, Origin, Payload, SubscriptionId,
};
pub use facade::{
    ConnectivityState, DenmType, FixedLocationProvider, GeoPosition, LocationProvider,
    ServiceState, StreamKind, V2xFacade,
};
pub use policies::{OnExhaustion, RetryPolicy};
pub use poller::{await_state, PollError, Polled};
pub use session::{SessionOrchestrator, SessionPhase};

// Optional: expose a simple built-in logging listener (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use listeners::LogListener;
