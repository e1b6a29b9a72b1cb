//! Request -> `RequestSignal` mapping.
//!
//! Client resolution follows the usual reverse-proxy convention: without
//! `trust_proxy` the client is the socket peer and no chain is known; with it,
//! the chain is the `X-Forwarded-For` list and the client is its left-most entry.

use std::net::IpAddr;

use axum::http::HeaderMap;

use geogate_core::RequestSignal;

/// Country asserted by the edge network (Cloudflare).
pub const COUNTRY_HEADER: &str = "cf-ipcountry";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// All `X-Forwarded-For` entries, client first, across repeated headers.
pub fn forwarded_chain(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(FORWARDED_FOR_HEADER)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// All `cf-ipcountry` values joined with `", "`.
///
/// Repeated headers collapse into one value that matches no allow-list entry,
/// so a client-sent header cannot shadow the one appended by the edge.
/// Non-UTF-8 bytes are kept (lossy) so such values are denied rather than treated as absent.
pub fn country_header(headers: &HeaderMap) -> Option<String> {
    let values: Vec<String> = headers
        .get_all(COUNTRY_HEADER)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

pub fn extract_signal(headers: &HeaderMap, peer: Option<IpAddr>, trust_proxy: bool) -> RequestSignal {
    let known_ips = if trust_proxy {
        forwarded_chain(headers)
    } else {
        Vec::new()
    };

    let client_ip = match known_ips.first() {
        Some(first) => Some(first.clone()),
        None => peer.map(|ip| ip.to_string()),
    };

    let country_header = country_header(headers);

    RequestSignal {
        client_ip,
        known_ips,
        country_header,
    }
}
