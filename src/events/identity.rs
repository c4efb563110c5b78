//! # First-seen own-identity classification.
//!
//! The facade reports the node's own broadcasts back through the same
//! list-changed events as peers' messages. [`IdentityClassifier`] learns the
//! node's station identity from the **first** envelope observed per stream
//! and labels every later envelope as own or other.
//!
//! ## Rules
//! - Identity is set exactly once per stream kind and never reset for the
//!   lifetime of the process. There is deliberately no re-detection after a
//!   broker reconnect: if the transport side hands out a new station id
//!   mid-session, later own messages are misclassified as `Other`. The
//!   original application behaves the same way; callers who need re-detection
//!   must build a fresh pipeline per session.
//! - A stream that never receives an envelope leaves its identity unset;
//!   that is not an error.
//! - The check-and-set is atomic (`OnceLock`), so classification stays
//!   correct even if a future design moves to multiple consumers.

use std::sync::OnceLock;

use crate::facade::StreamKind;

/// Own/other label for one envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// The envelope originated from this node's own station.
    Own,
    /// The envelope originated from a peer station.
    Other,
}

/// Learns own station identity per stream from the first observed envelope.
#[derive(Debug, Default)]
pub struct IdentityClassifier {
    slots: [OnceLock<u32>; 2],
}

impl IdentityClassifier {
    /// Creates a classifier with all identities unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies one observed station id for the given stream.
    ///
    /// The first call per stream records `station_id` as that stream's own
    /// identity and returns [`Origin::Own`].
    pub fn classify(&self, kind: StreamKind, station_id: u32) -> Origin {
        let own = self.slots[kind.index()].get_or_init(|| station_id);
        if *own == station_id {
            Origin::Own
        } else {
            Origin::Other
        }
    }

    /// The learned own identity for a stream, or `None` before any envelope
    /// arrived on it.
    pub fn own_station_id(&self, kind: StreamKind) -> Option<u32> {
        self.slots[kind.index()].get().copied()
    }
}
