//! # Inbound message envelopes and listener-facing deliveries.
//!
//! An [`EventEnvelope`] is one received message plus its metadata, as handed
//! to the delivery pipeline by the facade callback. It is consumed exactly
//! once by the pipeline's consumer, then discarded; nothing is persisted.
//!
//! A [`Delivery`] is what listeners observe: the envelope fields plus the
//! own/other classification computed by the consumer.

use std::sync::Arc;

use crate::facade::StreamKind;

/// Payload of one received message.
///
/// Opaque to the pipeline; field sets follow the vendor record types.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Cooperative awareness broadcast from a vehicle.
    Cam(CamData),
    /// Hazard notification.
    Denm(DenmData),
}

impl Payload {
    /// Stream kind this payload belongs to.
    pub fn kind(&self) -> StreamKind {
        match self {
            Payload::Cam(_) => StreamKind::Cam,
            Payload::Denm(_) => StreamKind::Denm,
        }
    }
}

/// Fields of a received CAM record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CamData {
    /// Sender latitude in decimal degrees.
    pub latitude: f64,
    /// Sender longitude in decimal degrees.
    pub longitude: f64,
    /// Sender speed in km/h.
    pub speed_kmh: f32,
}

/// Fields of a received DENM record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DenmData {
    /// Cause code of the notified event.
    pub cause_code: u8,
    /// Sub-cause code of the notified event.
    pub sub_cause_code: u8,
}

/// One received message plus metadata, as enqueued by the facade callback.
#[derive(Clone, Debug, PartialEq)]
pub struct EventEnvelope {
    /// Stream the message arrived on.
    pub kind: StreamKind,
    /// Station identifier of the message originator.
    pub origin_station_id: u32,
    /// Decoded record fields.
    pub payload: Payload,
    /// Receive timestamp in UTC milliseconds, stamped by the facade.
    pub received_at_ms: u64,
}

impl EventEnvelope {
    /// Wraps one decoded record with its metadata; the stream kind is
    /// derived from the payload.
    pub fn new(origin_station_id: u32, payload: Payload, received_at_ms: u64) -> Self {
        Self {
            kind: payload.kind(),
            origin_station_id,
            payload,
            received_at_ms,
        }
    }

    /// Wraps a CAM record.
    pub fn cam(origin_station_id: u32, data: CamData, received_at_ms: u64) -> Self {
        Self::new(origin_station_id, Payload::Cam(data), received_at_ms)
    }

    /// Wraps a DENM record.
    pub fn denm(origin_station_id: u32, data: DenmData, received_at_ms: u64) -> Self {
        Self::new(origin_station_id, Payload::Denm(data), received_at_ms)
    }
}

/// One classified message as observed by listeners.
///
/// Cheap to clone; shared between listeners of the same envelope via `Arc`
/// by the pipeline consumer.
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    /// Stream the message arrived on.
    pub kind: StreamKind,
    /// Station identifier of the message originator.
    pub origin_station_id: u32,
    /// True if the originator is this node's own station identity.
    pub is_own: bool,
    /// Decoded record fields.
    pub payload: Payload,
    /// Receive timestamp in UTC milliseconds.
    pub received_at_ms: u64,
}

impl Delivery {
    pub(crate) fn classified(envelope: &EventEnvelope, is_own: bool) -> Arc<Self> {
        Arc::new(Self {
            kind: envelope.kind,
            origin_station_id: envelope.origin_station_id,
            is_own,
            payload: envelope.payload.clone(),
            received_at_ms: envelope.received_at_ms,
        })
    }
}
