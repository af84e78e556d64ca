//! # locport-adapter-virtual
//!
//! Virtual location hardware for tests, demos and offline runs.
//!
//! ## Provided pieces
//!
//! | Piece | Role |
//! |-------|------|
//! | [`VirtualLocationHardware`] | In-memory `LocationHardware` reacting like a device |
//! | [`HardwareCall`] | One logged call, observable through `calls()` and `history()` |
//! | [`RouteReplay`] | Background task moving the device along waypoints |
//! | [`VirtualConfig`] | Initial state and simulated user answers |
//!
//! ## Dependency rule
//!
//! Depends on `locport-app` (port traits) and `locport-domain` only.

mod call;
mod config;
mod hardware;
mod replay;

pub use call::HardwareCall;
pub use config::VirtualConfig;
pub use hardware::{FullAccuracyOutcome, VirtualLocationHardware};
pub use replay::RouteReplay;
