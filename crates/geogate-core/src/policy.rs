//! Geoblock policy snapshot.
//!
//! A `Policy` is immutable once built. The gateway shares it behind an `Arc`
//! and swaps in a whole new snapshot on reconfiguration.

use crate::country::CountryCode;

/// Allow-list used when none is configured.
pub const DEFAULT_ALLOWED: [CountryCode; 1] = [CountryCode::RU];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    pub enabled: bool,
    /// Empty means "unset"; see [`Policy::allowed`].
    pub allowed_countries: Vec<CountryCode>,
}

impl Policy {
    pub fn new(enabled: bool, allowed_countries: Vec<CountryCode>) -> Self {
        Self { enabled, allowed_countries }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    /// Effective allow-list: the configured codes, or [`DEFAULT_ALLOWED`] when empty.
    pub fn allowed(&self) -> &[CountryCode] {
        if self.allowed_countries.is_empty() {
            &DEFAULT_ALLOWED
        } else {
            &self.allowed_countries
        }
    }

    pub fn is_allowed(&self, raw_country: &str) -> bool {
        self.allowed().iter().any(|c| c.matches(raw_country))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn empty_list_falls_back_to_ru() {
        let p = Policy::new(true, Vec::new());
        assert_eq!(p.allowed(), &[CountryCode::RU]);
        assert!(p.is_allowed("RU"));
        assert!(!p.is_allowed("BY"));
    }

    #[test]
    fn configured_list_replaces_default() {
        let by = CountryCode::parse("BY").unwrap();
        let p = Policy::new(true, vec![by]);
        assert_eq!(p.allowed(), &[by]);
        assert!(!p.is_allowed("RU"));
        assert!(p.is_allowed("BY"));
    }
}
