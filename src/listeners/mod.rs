//! Built-in listeners.
//!
//! Reference implementations of [`Listen`](crate::Listen) for demos and
//! debugging. Applications normally bring their own.

#[cfg(feature = "logging")]
mod log;

#[cfg(feature = "logging")]
pub use log::LogListener;
