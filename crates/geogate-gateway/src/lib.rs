//! geogate gateway library entry.
//!
//! Wires config, the geoblock policy runtime, the HTTP transport (signal
//! extraction + middleware), ops endpoints, and metrics into an axum stack.
//! Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod router;
pub mod transport;
