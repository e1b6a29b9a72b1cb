//! Policy layer.
//!
//! Compiles the geoblock config section into an immutable runtime snapshot that
//! the transport layer loads once per request.

pub mod runtime;

pub use runtime::GeoblockRuntime;
