//! # Session configuration.
//!
//! [`SessionConfig`] is the immutable input the orchestrator runs with:
//! facade credentials, enabled stream kinds, per-wait-point retry policies,
//! test coordinates, the steady-state observation window, and the shutdown
//! grace. Loading it (property files, environment, CLI) stays with the
//! caller; this crate only validates.
//!
//! ## Sentinel-free design
//! Both wait points carry their own full [`RetryPolicy`]. Deployed variants
//! of the original application disagree on the numbers (10 vs 30 attempts
//! for service-up, fail-fast vs warn-and-continue for connectivity), so the
//! defaults below are just the most common observation, not a baked-in
//! choice.
//!
//! # Example
//! ```
//! use v2x_session::SessionConfig;
//!
//! let mut cfg = SessionConfig::default();
//! cfg.application_id = "926696".into();
//! cfg.application_token = "secret-token".into();
//! cfg.cam_enabled = true;
//! cfg.denm_enabled = true;
//!
//! assert!(cfg.validate().is_ok());
//! assert_eq!(cfg.enabled_streams(), vec![
//!     v2x_session::StreamKind::Cam,
//!     v2x_session::StreamKind::Denm,
//! ]);
//! ```

use std::time::Duration;

use crate::error::SessionError;
use crate::facade::StreamKind;
use crate::policies::{OnExhaustion, RetryPolicy};

/// Immutable configuration for one session run.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Facade application identifier. Required.
    pub application_id: String,
    /// Facade application token. Required.
    pub application_token: String,

    /// Whether the CAM sub-service participates in this session.
    pub cam_enabled: bool,
    /// Whether the DENM sub-service participates in this session.
    pub denm_enabled: bool,

    /// Latitude used for outbound test events (decimal degrees).
    pub test_latitude: f64,
    /// Longitude used for outbound test events (decimal degrees).
    pub test_longitude: f64,

    /// Wait policy for the transport service reaching up-and-running.
    pub service_up: RetryPolicy,
    /// Wait policy for broker connectivity reaching connected.
    pub connectivity: RetryPolicy,

    /// Whether to trigger one demo DENM once sub-services run
    /// (only effective when DENM is enabled).
    pub send_test_denm: bool,

    /// Steady-state observation window before self-initiated termination.
    pub steady_window: Duration,
    /// Maximum time to wait for the delivery pipeline to drain on shutdown.
    pub grace: Duration,
}

impl SessionConfig {
    /// Checks that the configuration can drive a session.
    ///
    /// Credentials must be present and both retry policies must describe
    /// bounded, non-degenerate waits. Fails before any facade interaction.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.application_id.trim().is_empty() {
            return Err(SessionError::Config {
                reason: "application id is empty".into(),
            });
        }
        if self.application_token.trim().is_empty() {
            return Err(SessionError::Config {
                reason: "application token is empty".into(),
            });
        }
        if let Err(field) = self.service_up.validate() {
            return Err(SessionError::Config {
                reason: format!("service_up policy: {field}"),
            });
        }
        if let Err(field) = self.connectivity.validate() {
            return Err(SessionError::Config {
                reason: format!("connectivity policy: {field}"),
            });
        }
        Ok(())
    }

    /// Enabled stream kinds in configuration order (CAM before DENM).
    pub fn enabled_streams(&self) -> Vec<StreamKind> {
        StreamKind::ALL
            .into_iter()
            .filter(|kind| self.stream_enabled(*kind))
            .collect()
    }

    /// True if `kind` participates in this session.
    pub fn stream_enabled(&self, kind: StreamKind) -> bool {
        match kind {
            StreamKind::Cam => self.cam_enabled,
            StreamKind::Denm => self.denm_enabled,
        }
    }
}

impl Default for SessionConfig {
    /// Defaults mirror the original sample deployment:
    ///
    /// - credentials empty (must be supplied; validation fails otherwise)
    /// - both streams enabled
    /// - test coordinates 48.866667 / 2.333333
    /// - `service_up = 10 × 1s, FailFast`
    /// - `connectivity = 15 × 1s, WarnAndContinue`
    /// - one demo DENM on startup
    /// - `steady_window = 5s`, `grace = 5s`
    fn default() -> Self {
        Self {
            application_id: String::new(),
            application_token: String::new(),
            cam_enabled: true,
            denm_enabled: true,
            test_latitude: 48.866667,
            test_longitude: 2.333333,
            service_up: RetryPolicy::new(Duration::from_secs(1), 10, OnExhaustion::FailFast),
            connectivity: RetryPolicy::new(
                Duration::from_secs(1),
                15,
                OnExhaustion::WarnAndContinue,
            ),
            send_test_denm: true,
            steady_window: Duration::from_secs(5),
            grace: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SessionConfig {
        SessionConfig {
            application_id: "926696".into(),
            application_token: "token".into(),
            ..SessionConfig::default()
        }
    }

    #[test]
    fn test_default_requires_credentials() {
        let err = SessionConfig::default().validate().unwrap_err();
        assert_eq!(err.as_label(), "config_invalid");
    }

    #[test]
    fn test_blank_token_is_rejected() {
        let mut cfg = valid();
        cfg.application_token = "   ".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_degenerate_policy_is_rejected() {
        let mut cfg = valid();
        cfg.connectivity.max_attempts = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.as_message().contains("connectivity"));
    }

    #[test]
    fn test_enabled_streams_order_and_filtering() {
        let mut cfg = valid();
        assert_eq!(cfg.enabled_streams(), vec![StreamKind::Cam, StreamKind::Denm]);

        cfg.cam_enabled = false;
        assert_eq!(cfg.enabled_streams(), vec![StreamKind::Denm]);
        assert!(!cfg.stream_enabled(StreamKind::Cam));
        assert!(cfg.stream_enabled(StreamKind::Denm));
    }
}
