//! Shared error type across geogate crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Unsupported config version.
    UnsupportedVersion,
    /// Configuration could not be parsed or validated.
    ConfigInvalid,
    /// No upstream available to serve the request.
    UpstreamUnavailable,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::ConfigInvalid => "CONFIG_INVALID",
            ClientCode::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GeoGateError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum GeoGateError {
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("invalid config: {0}")]
    Config(String),
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl GeoGateError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            GeoGateError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            GeoGateError::Config(_) => ClientCode::ConfigInvalid,
            GeoGateError::UpstreamUnavailable(_) => ClientCode::UpstreamUnavailable,
            GeoGateError::Internal(_) => ClientCode::Internal,
        }
    }
}
