//! # Collaborator seams: the vendor facade and the location provider.
//!
//! The session core never talks MQTT, TLS, or wire encoding; it drives an
//! opaque vendor SDK through [`V2xFacade`] and obtains positions through
//! [`LocationProvider`]. Both are constructor-injected (`Arc<dyn ...>`),
//! never looked up from ambient state.
//!
//! ## Wiring
//! ```text
//! SessionOrchestrator ──► V2xFacade::start_transport / start_stream / ...
//!                    ──► V2xFacade::subscribe(kind, sink)
//!                                        │
//!                   facade callback ─────┘──► EventSink::push ──► EventPipeline
//! ```
//!
//! ## Rules
//! - State getters are idempotent and safe to poll at any rate.
//! - `start_stream`/`stop_stream` are no-op-safe if already in the requested
//!   state.
//! - The facade invokes the sink from its own concurrency domain; the sink
//!   never blocks it.

use async_trait::async_trait;

use crate::error::FacadeError;
use crate::events::EventSink;
use crate::facade::types::{ConnectivityState, DenmType, GeoPosition, ServiceState, StreamKind};

/// Handle to the vendor V2X facade.
///
/// Implementations wrap the real SDK client; tests script one. All methods
/// map one-to-one onto facade operations, with no orchestration logic of
/// their own.
#[async_trait]
pub trait V2xFacade: Send + Sync + 'static {
    /// Requests the transport service to start. Non-blocking: completion is
    /// observed by polling [`V2xFacade::service_state`].
    async fn start_transport(&self) -> Result<(), FacadeError>;

    /// Requests the transport service to stop.
    async fn stop_transport(&self) -> Result<(), FacadeError>;

    /// Current transport service state. Idempotent, poll-safe.
    fn service_state(&self) -> ServiceState;

    /// Current broker connectivity state. Idempotent, poll-safe.
    fn connectivity_state(&self) -> ConnectivityState;

    /// Starts the sub-service for one stream kind. No-op if already started.
    async fn start_stream(&self, kind: StreamKind) -> Result<(), FacadeError>;

    /// Stops the sub-service for one stream kind. No-op if already stopped.
    async fn stop_stream(&self, kind: StreamKind) -> Result<(), FacadeError>;

    /// Registers a push sink for inbound traffic of the given kind.
    ///
    /// The facade invokes [`EventSink::push`] asynchronously, from a context
    /// the core does not control, whenever a list-changed event occurs.
    fn subscribe(&self, kind: StreamKind, sink: EventSink) -> Result<(), FacadeError>;

    /// Triggers one outbound DENM at the given position.
    ///
    /// Returns a monotonically-assigned sequence number used later to
    /// terminate the event.
    async fn trigger_event(
        &self,
        event: DenmType,
        location: GeoPosition,
    ) -> Result<i64, FacadeError>;

    /// Terminates a previously triggered DENM by its sequence number.
    async fn terminate_event(&self, sequence_number: i64) -> Result<(), FacadeError>;

    /// Monotonic UTC time source in milliseconds, used to stamp outbound
    /// events.
    fn utc_time_ms(&self) -> u64;
}

/// Source of GNSS positions for the facade.
///
/// Any toggleable source producing a position on demand satisfies this
/// contract; the bundled [`FixedLocationProvider`](crate::FixedLocationProvider)
/// reports fixed test coordinates.
#[async_trait]
pub trait LocationProvider: Send + Sync + 'static {
    /// Starts producing positions. No-op if already on.
    async fn turn_on(&self) -> Result<(), FacadeError>;

    /// Stops producing positions. No-op if already off.
    async fn turn_off(&self) -> Result<(), FacadeError>;

    /// Latest position, or `None` while the provider is off.
    fn current(&self) -> Option<GeoPosition>;
}
