//! Wire types for the forex quote endpoint.

use crate::shared::serde_util::decimal_lenient;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Response envelope: `{ code, msg, data }`. `code == 0` is success.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuoteEnvelope {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<QuoteData>,
}

/// Quote payload. Field names follow the API's single-letter keys.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct QuoteData {
    /// Symbol.
    #[serde(default)]
    pub s: Option<String>,
    /// Last price.
    #[serde(default, deserialize_with = "decimal_lenient::deserialize")]
    pub ld: Decimal,
    /// Open.
    #[serde(default, deserialize_with = "decimal_lenient::deserialize")]
    pub o: Decimal,
    /// Previous close.
    #[serde(default, deserialize_with = "decimal_lenient::deserialize")]
    pub p: Decimal,
    /// Day high.
    #[serde(default, deserialize_with = "decimal_lenient::deserialize")]
    pub h: Decimal,
    /// Day low.
    #[serde(default, deserialize_with = "decimal_lenient::deserialize")]
    pub l: Decimal,
    /// Observation time, epoch milliseconds.
    #[serde(default)]
    pub t: Option<i64>,
    /// Volume.
    #[serde(default, deserialize_with = "decimal_lenient::deserialize")]
    pub v: Decimal,
    /// Turnover.
    #[serde(default, deserialize_with = "decimal_lenient::deserialize")]
    pub tu: Decimal,
    /// Trading status.
    #[serde(default)]
    pub ts: Option<i64>,
    /// Absolute change.
    #[serde(default, deserialize_with = "decimal_lenient::deserialize")]
    pub ch: Decimal,
    /// Percent change.
    #[serde(default, deserialize_with = "decimal_lenient::deserialize")]
    pub chp: Decimal,
}
