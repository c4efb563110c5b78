//! # Facade-owned state and value types.
//!
//! These types mirror what the vendor SDK reports; the session core only
//! ever **reads** them (by polling) and never mutates facade state directly.
//!
//! ## Contents
//! - [`ServiceState`] transport service lifecycle as reported by the facade
//! - [`ConnectivityState`] broker connectivity as reported by the facade
//! - [`StreamKind`] inbound/outbound traffic category (CAM / DENM)
//! - [`DenmType`] cause classification for outbound triggered events
//! - [`GeoPosition`] a GNSS fix handed to the facade for outbound events

use std::fmt;

/// Lifecycle state of the facade's transport service.
///
/// Owned by the facade; the orchestrator polls it read-only while waiting
/// for the service to come up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceState {
    /// Service not started.
    Down,
    /// Start requested, initialization in progress.
    Starting,
    /// Service fully operational.
    UpAndRunning,
    /// Service failed to initialize or crashed.
    Error,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceState::Down => "down",
            ServiceState::Starting => "starting",
            ServiceState::UpAndRunning => "up_and_running",
            ServiceState::Error => "error",
        };
        f.write_str(s)
    }
}

/// Connectivity state towards the facade's message broker.
///
/// The connection typically establishes only after sub-services start, so
/// the orchestrator polls this *after* registering subscriptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectivityState {
    /// No broker connection.
    Disconnected,
    /// Connection attempt in progress.
    Connecting,
    /// Connected to the broker.
    Connected,
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectivityState::Disconnected => "disconnected",
            ConnectivityState::Connecting => "connecting",
            ConnectivityState::Connected => "connected",
        };
        f.write_str(s)
    }
}

/// Category of V2X traffic, independently enable-able per session.
///
/// - **CAM**: periodically broadcast presence/status messages.
/// - **DENM**: event-triggered hazard notifications, explicitly terminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Cam,
    Denm,
}

impl StreamKind {
    /// All stream kinds in configuration order (CAM before DENM).
    pub const ALL: [StreamKind; 2] = [StreamKind::Cam, StreamKind::Denm];

    /// Dense index for per-kind storage.
    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            StreamKind::Cam => 0,
            StreamKind::Denm => 1,
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Cam => f.write_str("CAM"),
            StreamKind::Denm => f.write_str("DENM"),
        }
    }
}

/// Cause classification for an outbound triggered DENM.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenmType {
    /// Accident without securing measures in place.
    UnsecuredAccident,
    /// Road works ahead.
    RoadWorks,
    /// Stationary vehicle blocking a lane.
    StationaryVehicle,
}

impl fmt::Display for DenmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DenmType::UnsecuredAccident => "unsecured_accident",
            DenmType::RoadWorks => "road_works",
            DenmType::StationaryVehicle => "stationary_vehicle",
        };
        f.write_str(s)
    }
}

/// A GNSS fix handed to the facade when triggering outbound events.
///
/// Optional fields follow the vendor model: a fixed-coordinate provider
/// legitimately reports position and timestamp only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPosition {
    /// Latitude in decimal degrees (WGS84).
    pub latitude: f64,
    /// Longitude in decimal degrees (WGS84).
    pub longitude: f64,
    /// Altitude in meters, if known.
    pub altitude: Option<f64>,
    /// Heading in degrees clockwise from north, if known.
    pub heading: Option<f32>,
    /// Ground speed in m/s, if known.
    pub speed: Option<f32>,
    /// Horizontal accuracy in meters, if known.
    pub accuracy: Option<f32>,
    /// UTC timestamp of the fix in milliseconds.
    pub timestamp_ms: u64,
}

impl GeoPosition {
    /// Creates a position carrying coordinates and timestamp only.
    pub fn fixed(latitude: f64, longitude: f64, timestamp_ms: u64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            heading: None,
            speed: None,
            accuracy: None,
            timestamp_ms,
        }
    }
}
