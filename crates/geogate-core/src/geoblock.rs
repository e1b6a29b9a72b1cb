//! Access decision filter.
//!
//! `decide` is a pure function of the policy snapshot and the request signal;
//! its only side effect is emitting `tracing` events.
//!
//! Order of evaluation:
//! 1. policy disabled -> allow, silently
//! 2. no country header -> allow (debug for local callers, warn otherwise)
//! 3. header in effective allow-list -> allow
//! 4. anything else -> deny with the asserted code
//!
//! Missing signal never denies. Unknown or special edge markers (`T1`, `XX`)
//! are ordinary codes and are denied unless allow-listed.

use crate::policy::Policy;
use crate::signal::RequestSignal;

/// Where the country signal comes from (logged as `source`).
pub const COUNTRY_SOURCE: &str = "cf-ipcountry";

/// Outcome seen by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { country_code: String },
}

/// Which branch produced the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    Disabled,
    LocalCaller,
    NoCountrySignal,
    Granted,
    Denied,
}

impl Reason {
    /// Label used in metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Reason::Disabled => "disabled",
            Reason::LocalCaller => "local_caller",
            Reason::NoCountrySignal => "no_country_signal",
            Reason::Granted => "granted",
            Reason::Denied => "denied",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub decision: Decision,
    pub reason: Reason,
}

impl Verdict {
    fn allow(reason: Reason) -> Self {
        Self { decision: Decision::Allow, reason }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self.decision, Decision::Allow)
    }

    /// Denied country code, if this verdict is a denial.
    pub fn denied_country(&self) -> Option<&str> {
        match &self.decision {
            Decision::Deny { country_code } => Some(country_code.as_str()),
            Decision::Allow => None,
        }
    }
}

pub fn decide(policy: &Policy, signal: &RequestSignal) -> Verdict {
    if !policy.enabled {
        return Verdict::allow(Reason::Disabled);
    }

    let ip = signal.client_ip.as_deref();

    let Some(country) = signal.country() else {
        // Locally-resolved callers carry no edge header (dev, intra-network).
        if signal.is_local_caller() {
            tracing::debug!(ip, "client IP is local, country header not found, skipping geoblock");
            return Verdict::allow(Reason::LocalCaller);
        }
        tracing::warn!(ip, "country header not found, allowing request");
        return Verdict::allow(Reason::NoCountrySignal);
    };

    if policy.is_allowed(country) {
        tracing::debug!(ip, country, source = COUNTRY_SOURCE, "access granted by geoblock");
        return Verdict::allow(Reason::Granted);
    }

    let allowed: Vec<&str> = policy.allowed().iter().map(|c| c.as_str()).collect();
    tracing::warn!(
        ip,
        country,
        source = COUNTRY_SOURCE,
        allowed = ?allowed,
        "access denied by geoblock"
    );
    Verdict {
        decision: Decision::Deny { country_code: country.to_owned() },
        reason: Reason::Denied,
    }
}
