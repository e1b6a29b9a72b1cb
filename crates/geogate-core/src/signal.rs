//! Per-request inputs to the geoblock decision.

/// Client address information and the edge-asserted country for one request.
///
/// Built by the HTTP layer. `country_header` is taken as authoritative: whoever
/// builds the signal is responsible for dropping client-supplied values of the
/// country header before they get here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSignal {
    /// Resolved client address, if any.
    pub client_ip: Option<String>,
    /// Every address the request layer associated with this request (proxy chain).
    pub known_ips: Vec<String>,
    /// Raw country header value.
    pub country_header: Option<String>,
}

impl RequestSignal {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    #[must_use]
    pub fn with_known_ips(mut self, ips: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.known_ips = ips.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country_header = Some(country.into());
        self
    }

    /// Country header, with an empty value treated as absent.
    pub fn country(&self) -> Option<&str> {
        self.country_header.as_deref().filter(|c| !c.is_empty())
    }

    /// The client address is one the request layer itself resolved in its chain.
    pub fn is_local_caller(&self) -> bool {
        match &self.client_ip {
            Some(ip) => self.known_ips.iter().any(|k| k == ip),
            None => false,
        }
    }
}
