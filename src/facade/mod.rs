//! External collaborator seam: vendor facade and location provider.
//!
//! The vendor SDK (transport, encoding, state reporting) is out of scope and
//! appears here only as traits plus the read-only state types it owns.
//!
//! ## Contents
//! - [`V2xFacade`] / [`LocationProvider`] injected collaborator traits
//! - [`ServiceState`], [`ConnectivityState`] facade-owned state enums
//! - [`StreamKind`], [`DenmType`], [`GeoPosition`] value types
//! - [`FixedLocationProvider`] fixed-coordinate provider for demos/tests

mod location;
mod traits;
mod types;

pub use location::FixedLocationProvider;
pub use traits::{LocationProvider, V2xFacade};
pub use types::{ConnectivityState, DenmType, GeoPosition, ServiceState, StreamKind};
