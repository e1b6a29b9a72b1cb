//! geogate core: transport-agnostic geoblock policy, request signal, and the
//! access decision function.
//!
//! This crate carries no HTTP or runtime dependencies. The gateway crate maps
//! inbound requests onto [`RequestSignal`] and turns a [`Verdict`] into a
//! response; everything in between lives here.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Fallible paths surface as `GeoGateError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod country;
pub mod error;
pub mod geoblock;
pub mod policy;
pub mod signal;

/// Shared result type.
pub use error::{GeoGateError, Result};

pub use country::CountryCode;
pub use geoblock::{decide, Decision, Reason, Verdict};
pub use policy::Policy;
pub use signal::RequestSignal;
