//! Geoblock middleware.
//!
//! Runs before any request reaches the upstream router:
//! - load the current policy snapshot (one per request)
//! - optionally drop a country header sent by an untrusted peer
//! - build the `RequestSignal` and call `geogate_core::decide`
//! - allow -> `next`, deny -> 403 JSON, `next` is never called
//!
//! Trust boundary: the `cf-ipcountry` value is taken at face value. Unless
//! `geoblock.strip_untrusted_country_header` is on with the edge addresses
//! listed in `trusted_edges`, the deployment must guarantee that an edge in
//! front of the gateway overwrites this header on every request. Otherwise any
//! client can pick its own country.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use geogate_core::{decide, Decision};

use crate::app_state::AppState;
use crate::transport::signal::{self, COUNTRY_HEADER};

pub const DENIED_MESSAGE: &str =
    "Access denied. Your country is not permitted to access this service.";

fn forbidden_json(country_code: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": DENIED_MESSAGE,
            "country_code": country_code,
        })),
    )
        .into_response()
}

pub async fn geoblock(State(app): State<AppState>, mut req: Request, next: Next) -> Response {
    let runtime = app.geoblock();

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    if !runtime.trusts_country_header_from(peer) && req.headers().contains_key(COUNTRY_HEADER) {
        tracing::debug!(peer = ?peer, "dropping country header from untrusted peer");
        req.headers_mut().remove(COUNTRY_HEADER);
    }

    let signal = signal::extract_signal(req.headers(), peer, app.trust_proxy());
    let verdict = decide(runtime.policy(), &signal);
    app.metrics().record(&verdict);

    match verdict.decision {
        Decision::Allow => next.run(req).await,
        Decision::Deny { country_code } => forbidden_json(&country_code),
    }
}
