use std::net::IpAddr;

use geogate_core::{Policy, Result};

use crate::config::GeoblockSection;

/// Compiled geoblock settings.
/// Construct at startup (or reload), then share via `Arc`; never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct GeoblockRuntime {
    policy: Policy,
    strip_untrusted: bool,
    trusted_edges: Vec<IpAddr>,
}

impl GeoblockRuntime {
    pub fn new(section: &GeoblockSection) -> Result<Self> {
        Ok(Self {
            policy: Policy::new(section.enabled, section.allowed_countries.clone()),
            strip_untrusted: section.strip_untrusted_country_header,
            trusted_edges: section.trusted_edge_addrs()?,
        })
    }

    /// Same edge settings, different policy.
    #[must_use]
    pub fn with_policy(&self, policy: Policy) -> Self {
        Self {
            policy,
            strip_untrusted: self.strip_untrusted,
            trusted_edges: self.trusted_edges.clone(),
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Whether a country header arriving from `peer` may be used.
    ///
    /// With stripping off, every header is trusted and the deployment must
    /// guarantee an edge in front of the gateway overwrites it.
    pub fn trusts_country_header_from(&self, peer: Option<IpAddr>) -> bool {
        if !self.strip_untrusted {
            return true;
        }
        match peer {
            Some(ip) => self.trusted_edges.contains(&ip),
            None => false,
        }
    }
}
