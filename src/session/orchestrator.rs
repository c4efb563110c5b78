//! # SessionOrchestrator: drives the facade through a full session.
//!
//! The orchestrator owns the forward lifecycle on a single control-flow
//! task, blocking at each bounded wait — the lifecycle is inherently
//! sequential and low-frequency, so synchronous waits are simpler and safer
//! than an event-driven startup machine. Inbound traffic runs on the
//! [`EventPipeline`]'s own consumer and never touches the control task.
//!
//! ## High-level flow
//! ```text
//! run():
//!   validate config ──► location on ──► start transport
//!        └─► await service_state == UpAndRunning   (config.service_up)
//!        └─► pipeline.start(); subscribe enabled kinds (listeners + facade sink)
//!        └─► await connectivity == Connected       (config.connectivity)
//!        └─► start enabled sub-services (CAM before DENM)
//!        └─► optional demo DENM trigger (sequence number retained)
//!        └─► steady-state hold: window timer | stop token | OS signal
//!   terminate():   best-effort, each step logged, never re-raises
//!        └─► terminate active DENM (exactly once)
//!        └─► stop started sub-services
//!        └─► stop transport (if started)
//!        └─► pipeline.shutdown(config.grace)
//!        └─► location off
//! ```
//!
//! ## Rules
//! - Collaborators (facade, location provider, listeners) are injected at
//!   construction; nothing is looked up from ambient state.
//! - Listeners for a disabled stream are **never** registered, and its
//!   sub-service is never started.
//! - Subscriptions are registered before any sub-service starts, so no
//!   inbound message is lost to an unregistered listener.
//! - A wait exhaustion honors its policy's [`OnExhaustion`] flag: fail-fast
//!   aborts to cleanup, warn-and-continue logs and proceeds (sub-services
//!   may then start before connectivity is confirmed — observed, accepted
//!   behavior).
//! - Cancelling the stop token during any wait ends the session cleanly.

use std::sync::Arc;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::events::{EventPipeline, Listen};
use crate::facade::{
    ConnectivityState, DenmType, GeoPosition, LocationProvider, ServiceState, StreamKind,
    V2xFacade,
};
use crate::poller::{await_state, PollError};
use crate::policies::{OnExhaustion, RetryPolicy};
use crate::session::phase::SessionPhase;
use crate::session::signal;

/// Outcome of one bounded wait, as seen by the forward sequence.
enum Wait {
    /// Target state observed.
    Reached,
    /// Budget exhausted under `WarnAndContinue`; proceeding anyway.
    WarnedPast,
    /// Session teardown requested while waiting.
    Interrupted,
}

/// Coordinates the facade, the location provider, and the delivery pipeline
/// through one complete session.
pub struct SessionOrchestrator {
    config: SessionConfig,
    facade: Arc<dyn V2xFacade>,
    location: Arc<dyn LocationProvider>,
    pipeline: EventPipeline,
    listeners: Vec<(StreamKind, Arc<dyn Listen>)>,
    stop: CancellationToken,

    phase: SessionPhase,
    transport_started: bool,
    started_streams: Vec<StreamKind>,
    active_denm: Option<i64>,
}

impl SessionOrchestrator {
    /// Creates an orchestrator with injected collaborators.
    pub fn new(
        config: SessionConfig,
        facade: Arc<dyn V2xFacade>,
        location: Arc<dyn LocationProvider>,
    ) -> Self {
        Self {
            config,
            facade,
            location,
            pipeline: EventPipeline::new(),
            listeners: Vec::new(),
            stop: CancellationToken::new(),
            phase: SessionPhase::Init,
            transport_started: false,
            started_streams: Vec::new(),
            active_denm: None,
        }
    }

    /// Queues an application listener for registration.
    ///
    /// The listener is registered with the pipeline during startup, and only
    /// if its stream kind is enabled in the configuration.
    pub fn add_listener(&mut self, kind: StreamKind, listener: Arc<dyn Listen>) {
        self.listeners.push((kind, listener));
    }

    /// Token that requests session termination when cancelled.
    ///
    /// Cancelling it during steady state — or during any bounded wait —
    /// moves the session to cleanup within one poll interval.
    pub fn stop_token(&self) -> CancellationToken {
        self.stop.clone()
    }

    /// Access to the delivery pipeline (pull-style consumption, identity
    /// queries).
    pub fn pipeline(&self) -> &EventPipeline {
        &self.pipeline
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Runs the full session: forward sequence, steady-state hold, cleanup.
    ///
    /// Returns `Ok(())` on clean completion. On fatal error the remaining
    /// forward transitions are skipped, cleanup still runs in full, and the
    /// original error is returned — map it to a non-zero exit status at the
    /// binary boundary.
    pub async fn run(&mut self) -> Result<(), SessionError> {
        tracing::info!("v2x session starting");
        let result = self.advance().await;

        match result {
            Ok(()) => {
                self.terminate().await;
                tracing::info!("v2x session completed");
                Ok(())
            }
            Err(err) => {
                self.phase = SessionPhase::Error;
                tracing::error!(
                    label = err.as_label(),
                    error = %err.as_message(),
                    "fatal session error; cleaning up"
                );
                self.terminate().await;
                Err(err)
            }
        }
    }

    /// Forward transitions: configuration through the steady-state hold.
    async fn advance(&mut self) -> Result<(), SessionError> {
        // Configuration is validated before any facade interaction.
        self.config.validate()?;
        self.phase = SessionPhase::Configured;
        tracing::info!(
            application_id = %self.config.application_id,
            cam = self.config.cam_enabled,
            denm = self.config.denm_enabled,
            "configuration valid"
        );

        self.location
            .turn_on()
            .await
            .map_err(|e| SessionError::facade("location_turn_on", e))?;

        self.facade
            .start_transport()
            .await
            .map_err(|e| SessionError::facade("start_transport", e))?;
        self.transport_started = true;
        self.phase = SessionPhase::ServiceStarting;
        tracing::info!("transport service start requested");

        let facade = Arc::clone(&self.facade);
        match self
            .wait_for(
                "service up",
                move || facade.service_state(),
                ServiceState::UpAndRunning,
                self.config.service_up,
            )
            .await?
        {
            Wait::Interrupted => return Ok(()),
            Wait::Reached | Wait::WarnedPast => {}
        }
        self.phase = SessionPhase::ServiceUp;
        tracing::info!("transport service up and running");

        // Register everything before any sub-service starts: no inbound
        // message may be lost to an unregistered listener.
        self.phase = SessionPhase::ConnectivityWait;
        self.pipeline.start();
        for kind in self.config.enabled_streams() {
            for (k, listener) in &self.listeners {
                if *k == kind {
                    self.pipeline.subscribe(kind, Arc::clone(listener));
                }
            }
            self.facade
                .subscribe(kind, self.pipeline.sink())
                .map_err(|e| SessionError::facade("subscribe", e))?;
            tracing::info!(%kind, "facade subscription registered");
        }

        let facade = Arc::clone(&self.facade);
        match self
            .wait_for(
                "connectivity",
                move || facade.connectivity_state(),
                ConnectivityState::Connected,
                self.config.connectivity,
            )
            .await?
        {
            Wait::Interrupted => return Ok(()),
            Wait::Reached => tracing::info!("connected to the broker"),
            Wait::WarnedPast => {}
        }
        self.phase = SessionPhase::Subscribed;

        // CAM before DENM, matching configuration order.
        for kind in self.config.enabled_streams() {
            self.facade
                .start_stream(kind)
                .await
                .map_err(|e| SessionError::facade("start_stream", e))?;
            self.started_streams.push(kind);
            tracing::info!(%kind, "sub-service started");
        }
        self.phase = SessionPhase::SubservicesRunning;

        if self.config.denm_enabled && self.config.send_test_denm {
            let stamped = self.facade.utc_time_ms();
            let position = self.location.current().unwrap_or_else(|| {
                GeoPosition::fixed(
                    self.config.test_latitude,
                    self.config.test_longitude,
                    stamped,
                )
            });
            let seq = self
                .facade
                .trigger_event(DenmType::UnsecuredAccident, position)
                .await
                .map_err(|e| SessionError::facade("trigger_event", e))?;
            self.active_denm = Some(seq);
            tracing::info!(sequence_number = seq, "demo DENM triggered");
        }

        self.phase = SessionPhase::SteadyState;
        tracing::info!(
            window_ms = self.config.steady_window.as_millis() as u64,
            "steady state; receiving traffic"
        );
        tokio::select! {
            _ = time::sleep(self.config.steady_window) => {
                tracing::info!("observation window elapsed");
            }
            _ = self.stop.cancelled() => {
                tracing::info!("stop requested");
            }
            _ = signal::wait_for_stop_signal() => {
                tracing::info!("termination signal received");
            }
        }
        Ok(())
    }

    /// One bounded wait, mapped through the policy's exhaustion flag.
    async fn wait_for<S, F>(
        &self,
        what: &'static str,
        read: F,
        target: S,
        policy: RetryPolicy,
    ) -> Result<Wait, SessionError>
    where
        S: PartialEq + std::fmt::Debug,
        F: Fn() -> S,
    {
        match await_state(what, read, target, &policy, &self.stop).await {
            Ok(polled) => {
                tracing::info!(
                    wait = what,
                    attempts = polled.attempts,
                    elapsed_ms = polled.elapsed.as_millis() as u64,
                    "wait succeeded"
                );
                Ok(Wait::Reached)
            }
            Err(PollError::Exhausted { attempts }) => match policy.on_exhaustion {
                OnExhaustion::FailFast => Err(SessionError::WaitExhausted {
                    what,
                    attempts,
                    interval: policy.interval,
                }),
                OnExhaustion::WarnAndContinue => {
                    tracing::warn!(
                        wait = what,
                        attempts,
                        interval_ms = policy.interval.as_millis() as u64,
                        "wait exhausted; continuing anyway"
                    );
                    Ok(Wait::WarnedPast)
                }
            },
            Err(PollError::Canceled) => {
                tracing::info!(wait = what, "wait interrupted by stop request");
                Ok(Wait::Interrupted)
            }
        }
    }

    /// Best-effort cleanup in fixed reverse order.
    ///
    /// Every step logs its own failure; no step prevents the remaining
    /// ones, and nothing is re-raised from here.
    async fn terminate(&mut self) {
        self.phase = SessionPhase::Terminating;
        tracing::info!("terminating session");

        if let Some(seq) = self.active_denm.take() {
            match self.facade.terminate_event(seq).await {
                Ok(()) => tracing::info!(sequence_number = seq, "active DENM terminated"),
                Err(e) => tracing::error!(
                    sequence_number = seq,
                    error = %e,
                    "failed to terminate active DENM"
                ),
            }
        }

        for kind in std::mem::take(&mut self.started_streams) {
            if let Err(e) = self.facade.stop_stream(kind).await {
                tracing::error!(%kind, error = %e, "failed to stop sub-service");
            } else {
                tracing::info!(%kind, "sub-service stopped");
            }
        }

        if self.transport_started {
            if let Err(e) = self.facade.stop_transport().await {
                tracing::error!(error = %e, "failed to stop transport service");
            } else {
                tracing::info!("transport service stopped");
            }
        }

        if let Err(e) = self.pipeline.shutdown(self.config.grace).await {
            tracing::warn!(error = %e.as_message(), "delivery pipeline did not drain");
        }

        if let Err(e) = self.location.turn_off().await {
            tracing::error!(error = %e, "failed to stop location provider");
        }

        self.phase = SessionPhase::Stopped;
        tracing::info!("cleanup completed");
    }
}
