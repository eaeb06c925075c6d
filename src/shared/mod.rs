//! Shared newtypes and utilities used across all domain modules.

pub mod conversion;
pub mod fmt;
pub mod serde_util;

pub use conversion::UnitConverter;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── InstrumentCode ──────────────────────────────────────────────────────────

/// Newtype for quote API instrument codes (e.g. `"XAUUSD"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstrumentCode(String);

impl InstrumentCode {
    /// London gold, USD per troy ounce.
    pub const LONDON_GOLD: &'static str = "XAUUSD";
    /// London silver, USD per troy ounce.
    pub const LONDON_SILVER: &'static str = "XAGUSD";

    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn london_gold() -> Self {
        Self::new(Self::LONDON_GOLD)
    }

    pub fn london_silver() -> Self {
        Self::new(Self::LONDON_SILVER)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InstrumentCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InstrumentCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for InstrumentCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for InstrumentCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(InstrumentCode(s.to_string()))
    }
}

impl Serialize for InstrumentCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for InstrumentCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(InstrumentCode(s))
    }
}
