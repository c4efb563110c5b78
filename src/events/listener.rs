//! # Message listener trait.
//!
//! Provides [`Listen`], the extension point for plugging application
//! handlers into the delivery pipeline.
//!
//! Each listener gets:
//! - **Sequential FIFO delivery** (the pipeline's single consumer invokes
//!   listeners one after another, in registration order per stream)
//! - **Panic isolation** (panics are caught and logged; delivery continues
//!   with the next listener and the next envelope)
//!
//! ## Rules
//! - A slow listener delays — but never drops — delivery to the listeners
//!   after it for the same envelope.
//! - Handle errors internally; do not panic.
//! - Use async I/O; avoid blocking the executor.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use v2x_session::{Delivery, Listen};
//!
//! struct PeerCounter;
//!
//! #[async_trait]
//! impl Listen for PeerCounter {
//!     async fn on_message(&self, delivery: &Delivery) {
//!         if !delivery.is_own {
//!             // count a peer message, export a metric, etc.
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "peer-counter" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::envelope::Delivery;

/// Application handler for received, classified messages.
///
/// Called from the pipeline's consumer task, never from the facade's
/// producer context.
#[async_trait]
pub trait Listen: Send + Sync + 'static {
    /// Processes one classified message.
    ///
    /// Panics are caught by the pipeline and reported; other listeners and
    /// subsequent envelopes are unaffected.
    async fn on_message(&self, delivery: &Delivery);

    /// Returns the listener name used in logs.
    ///
    /// Prefer short, descriptive names (e.g., "cam-log", "hazard-alert").
    /// The default uses `type_name::<Self>()`, which can be verbose —
    /// override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
