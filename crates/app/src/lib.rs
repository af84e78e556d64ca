//! # locport-app
//!
//! Application layer: the **capability interface** and the **port
//! definitions** (traits) it is built on.
//!
//! ## Responsibilities
//! - Define the driven port adapters implement:
//!   - `LocationHardware`: the opaque hardware service (queries, commands,
//!     single delegate registration)
//!   - `LocationDelegate`: the callback surface the hardware invokes
//! - Define the driving surface application logic depends on:
//!   - `LocationManager`: a record of independently assignable operations
//! - Provide **in-process infrastructure** that doesn't need IO:
//!   - `ActionBroadcaster`: multicast fan-out of actions to subscribers
//!   - `DelegateBridge`: delegate callbacks → actions
//!   - `Completion`: single-resolution bridge for completion handlers
//! - Provide the deterministic and strict test adapters (`testing`)
//!
//! ## Dependency rule
//! Depends on `locport-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod action_bus;
pub mod completion;
pub mod delegate_bridge;
pub mod manager;
pub mod ports;
pub mod testing;

pub use action_bus::{ActionBroadcaster, ActionStream};
pub use completion::{Completion, Pending};
pub use delegate_bridge::DelegateBridge;
pub use manager::LocationManager;
