use std::net::{IpAddr, SocketAddr};

use geogate_core::{
    error::{GeoGateError, Result},
    CountryCode,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub geoblock: GeoblockSection,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
            geoblock: GeoblockSection::default(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GeoGateError::UnsupportedVersion);
        }

        self.gateway.validate()?;
        self.geoblock.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Resolve the client from `X-Forwarded-For` instead of the socket peer.
    #[serde(default)]
    pub trust_proxy: bool,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            trust_proxy: false,
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            GeoGateError::Config(format!(
                "gateway.listen must be a valid socket address: {}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeoblockSection {
    #[serde(default)]
    pub enabled: bool,

    /// Empty or absent => `RU` only.
    #[serde(default)]
    pub allowed_countries: Vec<CountryCode>,

    /// Drop the country header unless the socket peer is a trusted edge.
    #[serde(default)]
    pub strip_untrusted_country_header: bool,

    #[serde(default)]
    pub trusted_edges: Vec<String>,
}

impl GeoblockSection {
    pub fn validate(&self) -> Result<()> {
        self.trusted_edge_addrs().map(|_| ())
    }

    pub fn trusted_edge_addrs(&self) -> Result<Vec<IpAddr>> {
        self.trusted_edges
            .iter()
            .map(|s| {
                s.parse().map_err(|_| {
                    GeoGateError::Config(format!("geoblock.trusted_edges: invalid IP address: {s}"))
                })
            })
            .collect()
    }
}
