//! Gateway config loader (strict parsing + env overrides).

pub mod schema;

use std::{fs, io::ErrorKind, path::Path};

use geogate_core::{
    error::{GeoGateError, Result},
    CountryCode,
};

pub use schema::{GatewayConfig, GatewaySection, GeoblockSection};

/// Toggles geoblocking (`true/false`, `1/0`, `yes/no`, `on/off`).
pub const ENV_ENABLED: &str = "GEOBLOCK_ENABLED";
/// Comma-separated allow-list, e.g. `RU,BY`.
pub const ENV_ALLOWED_COUNTRIES: &str = "GEOBLOCK_ALLOWED_COUNTRIES";

pub fn load_from_file(path: impl AsRef<Path>) -> Result<GatewayConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| {
        GeoGateError::Config(format!("read config failed ({}): {e}", path.display()))
    })?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| GeoGateError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Startup/reload entry: `path` (defaults only when it does not exist), then `GEOBLOCK_*` env overrides.
/// An unreadable file is an error, never a silent fallback.
pub fn load(path: impl AsRef<Path>) -> Result<GatewayConfig> {
    let path = path.as_ref();
    let mut cfg = match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s)?,
        // A dangling symlink also reports NotFound; only a truly absent path falls back.
        Err(e) if e.kind() == ErrorKind::NotFound && fs::symlink_metadata(path).is_err() => {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            GatewayConfig::default()
        }
        Err(e) => {
            return Err(GeoGateError::Config(format!(
                "read config failed ({}): {e}",
                path.display()
            )))
        }
    };
    apply_env_overrides(&mut cfg)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn apply_env_overrides(cfg: &mut GatewayConfig) -> Result<()> {
    apply_overrides(cfg, |key| std::env::var(key).ok())
}

/// Apply `GEOBLOCK_*` overrides from an arbitrary lookup (process env in production).
pub fn apply_overrides<F>(cfg: &mut GatewayConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(ENV_ENABLED) {
        cfg.geoblock.enabled = parse_bool(&raw).ok_or_else(|| {
            GeoGateError::Config(format!("{ENV_ENABLED}: expected a boolean, got {raw:?}"))
        })?;
    }

    if let Some(raw) = lookup(ENV_ALLOWED_COUNTRIES) {
        cfg.geoblock.allowed_countries = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(CountryCode::parse_lenient)
            .collect::<Result<Vec<_>>>()
            .map_err(|e| GeoGateError::Config(format!("{ENV_ALLOWED_COUNTRIES}: {e}")))?;
    }

    Ok(())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
