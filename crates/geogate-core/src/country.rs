//! ISO-3166-1 alpha-2 country codes as asserted by the edge network.
//!
//! Only the allow-list side is parsed into [`CountryCode`]. The inbound header
//! value is compared verbatim, so a malformed header simply never matches.

use std::fmt;

use serde::Deserialize;

use crate::error::{GeoGateError, Result};

/// Two-character uppercase code (`RU`, `BY`, or edge markers such as `T1`, `XX`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    pub const RU: CountryCode = CountryCode(*b"RU");

    /// Strict parse: exactly two ASCII uppercase letters or digits.
    pub fn parse(s: &str) -> Result<Self> {
        match s.as_bytes() {
            [a, b] if is_code_byte(*a) && is_code_byte(*b) => Ok(Self([*a, *b])),
            _ => Err(GeoGateError::Config(format!(
                "invalid country code: {s:?} (expected two uppercase ASCII characters)"
            ))),
        }
    }

    /// Lenient parse used for operator input (env vars): trims and uppercases first.
    pub fn parse_lenient(s: &str) -> Result<Self> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Exact, case-sensitive comparison against a raw header value.
    pub fn matches(&self, raw: &str) -> bool {
        raw.as_bytes() == self.0
    }
}

fn is_code_byte(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit()
}

impl TryFrom<String> for CountryCode {
    type Error = GeoGateError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
