//! # Simple logging listener for debugging and demos.
//!
//! [`LogListener`] reports every delivery through `tracing` in a
//! human-readable form, mirroring what the original console handlers
//! printed per received record.
//!
//! Not intended for production use — implement a custom
//! [`Listen`](crate::Listen) for metrics or application logic.

use async_trait::async_trait;

use crate::events::{Delivery, Listen, Payload};

/// Logging listener printing one line per classified message.
///
/// Enabled via the `logging` feature.
#[derive(Debug, Default)]
pub struct LogListener;

#[async_trait]
impl Listen for LogListener {
    async fn on_message(&self, delivery: &Delivery) {
        match &delivery.payload {
            Payload::Cam(cam) => {
                tracing::info!(
                    station_id = delivery.origin_station_id,
                    own = delivery.is_own,
                    latitude = cam.latitude,
                    longitude = cam.longitude,
                    speed_kmh = cam.speed_kmh,
                    "CAM received"
                );
            }
            Payload::Denm(denm) => {
                tracing::info!(
                    station_id = delivery.origin_station_id,
                    own = delivery.is_own,
                    cause_code = denm.cause_code,
                    sub_cause_code = denm.sub_cause_code,
                    "DENM received"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
