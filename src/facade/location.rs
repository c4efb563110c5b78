//! # Fixed-coordinate location provider.
//!
//! [`FixedLocationProvider`] reports a single configured position with a
//! fresh timestamp on every read. It replaces a real GNSS source in demos
//! and tests; any provider with `turn_on`/`turn_off` semantics is
//! interchangeable with it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::error::FacadeError;
use crate::facade::traits::LocationProvider;
use crate::facade::types::GeoPosition;

/// Location provider pinned to fixed test coordinates.
pub struct FixedLocationProvider {
    latitude: f64,
    longitude: f64,
    running: AtomicBool,
}

impl FixedLocationProvider {
    /// Creates a provider reporting the given coordinates, initially off.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            running: AtomicBool::new(false),
        }
    }

    /// True while the provider is turned on.
    pub fn is_on(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn turn_on(&self) -> Result<(), FacadeError> {
        if !self.running.swap(true, Ordering::Relaxed) {
            tracing::info!(
                latitude = self.latitude,
                longitude = self.longitude,
                "location provider started"
            );
        }
        Ok(())
    }

    async fn turn_off(&self) -> Result<(), FacadeError> {
        if self.running.swap(false, Ordering::Relaxed) {
            tracing::info!("location provider stopped");
        }
        Ok(())
    }

    fn current(&self) -> Option<GeoPosition> {
        if !self.running.load(Ordering::Relaxed) {
            return None;
        }
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Some(GeoPosition::fixed(self.latitude, self.longitude, now_ms))
    }
}
