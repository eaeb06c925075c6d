//! Quote domain: normalized spot quotes for a single instrument.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::shared::InstrumentCode;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// A spot quote. Immutable once built; folded into display state and dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub code: InstrumentCode,
    pub last: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    /// Not sent by the forex endpoint.
    pub bid: Option<Decimal>,
    /// Not sent by the forex endpoint.
    pub ask: Option<Decimal>,
    pub high: Decimal,
    pub low: Decimal,
    pub open: Decimal,
    pub previous_close: Decimal,
    pub timestamp: DateTime<Utc>,
}
