//! Inbound event model and delivery pipeline.
//!
//! This module groups the event **data model** and the **pipeline** that
//! turns push-style facade callbacks into ordered, fault-isolated
//! notifications to application listeners.
//!
//! ## Contents
//! - [`EventEnvelope`], [`Payload`], [`Delivery`] message data model
//! - [`IdentityClassifier`], [`Origin`] first-seen own-identity detection
//! - [`Listen`] application listener capability
//! - [`EventPipeline`], [`EventSink`], [`SubscriptionId`] queue + consumer
//!
//! ## Quick reference
//! - **Producers**: the facade's push callbacks, via [`EventSink::push`].
//! - **Consumer**: exactly one task per pipeline; classifies, buffers for
//!   pull access, then fans out to listeners in registration order.
//!
//! See `session/orchestrator.rs` for the lifecycle-level wiring.

mod envelope;
mod identity;
mod listener;
mod pipeline;

pub use envelope::{CamData, Delivery, DenmData, EventEnvelope, Payload};
pub use identity::{IdentityClassifier, Origin};
pub use listener::Listen;
pub use pipeline::{EventPipeline, EventSink, SubscriptionId};
