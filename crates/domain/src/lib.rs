//! # locport-domain
//!
//! Pure domain model for the locport location capability layer.
//!
//! ## Responsibilities
//! - Value types describing readings from a location service: locations,
//!   headings, regions, beacons, visits, authorization states
//! - The [`Action`](action::Action) enum: one variant per delegate callback
//! - The [`LocationError`](error::LocationError) model and its
//!   classification codes
//! - [`Properties`](properties::Properties), the partial reconfiguration
//!   object
//! - [`PlatformCapabilities`](platform::PlatformCapabilities), the per-target
//!   capability table
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod action;
pub mod authorization;
pub mod beacon;
pub mod heading;
pub mod location;
pub mod platform;
pub mod properties;
pub mod region;
pub mod visit;
