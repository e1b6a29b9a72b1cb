//! Transport layer (HTTP).
//!
//! Maps inbound requests onto a `RequestSignal`, runs the geoblock decision
//! before anything is forwarded, and renders JSON error bodies.

pub mod geoblock;
pub mod signal;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use geogate_core::GeoGateError;

/// JSON error body: `{"error": ..., "code": ...}`.
pub fn error_response(status: StatusCode, err: &GeoGateError) -> Response {
    (
        status,
        Json(json!({
            "error": err.to_string(),
            "code": err.client_code().as_str(),
        })),
    )
        .into_response()
}
