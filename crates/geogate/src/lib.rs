//! Top-level facade crate for geogate.
//!
//! Re-exports the decision core and the gateway library so users can depend on a single crate.

pub mod core {
    pub use geogate_core::*;
}

pub mod gateway {
    pub use geogate_gateway::*;
}
