//! Shared application state for the geogate gateway.
//!
//! The geoblock runtime sits behind an `ArcSwap`: requests load one snapshot
//! and evaluate against it, reloads store a freshly compiled one.

use std::sync::Arc;

use arc_swap::ArcSwap;

use geogate_core::{Policy, Result};

use crate::config::GatewayConfig;
use crate::obs::GatewayMetrics;
use crate::policy::GeoblockRuntime;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<GatewayMetrics>,
}

struct AppStateInner {
    trust_proxy: bool,
    geoblock: ArcSwap<GeoblockRuntime>,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: &GatewayConfig) -> Result<Self> {
        let runtime = GeoblockRuntime::new(&cfg.geoblock)?;

        tracing::info!(
            enabled = runtime.policy().enabled,
            allowed = ?runtime.policy().allowed(),
            trust_proxy = cfg.gateway.trust_proxy,
            "geoblock policy compiled"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                trust_proxy: cfg.gateway.trust_proxy,
                geoblock: ArcSwap::from_pointee(runtime),
            }),
            metrics: Arc::new(GatewayMetrics::default()),
        })
    }

    pub fn trust_proxy(&self) -> bool {
        self.inner.trust_proxy
    }

    /// Current snapshot. Hold it for the whole request so one request never
    /// sees two policies.
    pub fn geoblock(&self) -> Arc<GeoblockRuntime> {
        self.inner.geoblock.load_full()
    }

    /// Swap in a new policy, keeping the current edge trust settings.
    pub fn replace_policy(&self, policy: Policy) {
        self.inner
            .geoblock
            .rcu(|current| current.with_policy(policy.clone()));
    }

    /// Recompile the whole geoblock section (SIGHUP reload path).
    /// On error the previous snapshot stays in place.
    pub fn reload(&self, cfg: &GatewayConfig) -> Result<()> {
        let outcome = GeoblockRuntime::new(&cfg.geoblock);
        let result = if outcome.is_ok() { "ok" } else { "error" };
        self.metrics.policy_reloads.inc(&[("result", result)]);

        let runtime = outcome?;
        if cfg.gateway.trust_proxy != self.inner.trust_proxy {
            tracing::warn!("gateway.trust_proxy changes require a restart; keeping current value");
        }
        tracing::info!(
            enabled = runtime.policy().enabled,
            allowed = ?runtime.policy().allowed(),
            "geoblock policy reloaded"
        );
        self.inner.geoblock.store(Arc::new(runtime));
        Ok(())
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }
}
