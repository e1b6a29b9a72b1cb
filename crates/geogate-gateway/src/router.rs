//! Axum router wiring.
//!
//! Ops routes are mounted as-is; everything in `upstream` is wrapped by the
//! geoblock middleware.

use axum::{http::StatusCode, middleware::from_fn_with_state, response::Response, routing::get, Router};

use geogate_core::GeoGateError;

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState, upstream: Router) -> Router {
    let guarded = upstream.layer(from_fn_with_state(
        state.clone(),
        transport::geoblock::geoblock,
    ));

    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
        .merge(guarded)
}

/// Stand-in upstream for the bundled binary: forwarding is not wired, so every
/// admitted request gets a 502.
pub fn unconfigured_upstream() -> Router {
    Router::new().fallback(upstream_unavailable)
}

async fn upstream_unavailable() -> Response {
    transport::error_response(
        StatusCode::BAD_GATEWAY,
        &GeoGateError::UpstreamUnavailable("no upstream configured".into()),
    )
}
