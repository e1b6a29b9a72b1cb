//! Minimal metrics registry for the gateway.
//!
//! Counter values live in a `DashMap` keyed by sorted label pairs so rendering
//! order is stable per label set.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use geogate_core::{CountryCode, Verdict};

/// Label for denied header values that are not well-formed country codes.
pub const INVALID_COUNTRY_LABEL: &str = "invalid";

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        let mut key: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        key.sort();

        let counter = self.map.entry(key).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Current value for an exact label set (0 if never incremented).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        let mut key: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        key.sort();
        self.map
            .get(&key)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Number of distinct label sets.
    pub fn series(&self) -> usize {
        self.map.len()
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let label_str = r
                .key()
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                .collect::<Vec<_>>()
                .join(",");
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str, val);
        }
    }
}

#[derive(Default)]
pub struct GatewayMetrics {
    pub decisions: CounterVec,
    pub denied_countries: CounterVec,
    pub policy_reloads: CounterVec,
    draining: AtomicBool,
}

impl GatewayMetrics {
    /// Count one geoblock verdict.
    pub fn record(&self, verdict: &Verdict) {
        let outcome = if verdict.is_allowed() { "allow" } else { "deny" };
        self.decisions
            .inc(&[("outcome", outcome), ("reason", verdict.reason.as_str())]);
        // The header is client-controlled; only well-formed codes become labels.
        if let Some(raw) = verdict.denied_country() {
            let label = match CountryCode::parse(raw) {
                Ok(code) => code.to_string(),
                Err(_) => INVALID_COUNTRY_LABEL.to_owned(),
            };
            self.denied_countries.inc(&[("country", label.as_str())]);
        }
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.draining.store(true, Ordering::Relaxed);
    }
    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Relaxed)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.decisions.render("geogate_decisions_total", &mut out);
        self.denied_countries
            .render("geogate_denied_countries_total", &mut out);
        self.policy_reloads.render("geogate_policy_reloads_total", &mut out);
        let _ = writeln!(
            out,
            "# TYPE geogate_draining gauge\ngeogate_draining {}",
            if self.is_draining() { 1 } else { 0 }
        );
        out
    }
}
