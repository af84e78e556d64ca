//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the capability layer and the hardware.
//! They are defined here (in `app`) so that both the capability interface
//! and the adapter layer can depend on them without creating circular
//! dependencies.

pub mod delegate;
pub mod hardware;

pub use delegate::LocationDelegate;
pub use hardware::LocationHardware;
