//! geogate gateway
//!
//! - Geoblock admission check in front of the upstream router
//! - Ops endpoints: /healthz, /readyz, /metrics
//! - SIGHUP re-reads the config and swaps the policy snapshot
//! - ctrl-c drains and shuts down

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing_subscriber::{fmt, EnvFilter};

use geogate_core::{GeoGateError, Result};
use geogate_gateway::{app_state::AppState, config, router};

const DEFAULT_CONFIG_PATH: &str = "geogate.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let cfg = config::load(&path)?;
    let listen = cfg.gateway.listen_addr()?;

    let state = AppState::new(&cfg)?;
    let app = router::build_router(state.clone(), router::unconfigured_upstream());

    spawn_reload_on_sighup(state.clone(), path);

    tracing::info!(%listen, "geogate-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| GeoGateError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| GeoGateError::Internal(format!("server failed: {e}")))?;

    tracing::info!("geogate-gateway stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler failed; shutting down");
    }
    state.set_draining();
    tracing::info!("shutdown requested, draining");
}

#[cfg(unix)]
fn spawn_reload_on_sighup(state: AppState, path: PathBuf) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "SIGHUP handler unavailable; policy reload disabled");
                return;
            }
        };
        while hup.recv().await.is_some() {
            let reloaded = match config::load(&path) {
                Ok(cfg) => state.reload(&cfg),
                Err(e) => {
                    state.metrics().policy_reloads.inc(&[("result", "error")]);
                    Err(e)
                }
            };
            if let Err(e) = reloaded {
                tracing::warn!(error = %e, path = %path.display(), "policy reload failed; keeping previous policy");
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_reload_on_sighup(_state: AppState, _path: PathBuf) {}
