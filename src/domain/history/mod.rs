//! Price history domain: primary-metal samples and chart time windows.

pub mod state;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::{PriceHistory, SharedHistory};

/// Target retention for the rolling history.
pub const RETENTION_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Lower bound on retained samples, whatever the refresh interval.
pub const MIN_HISTORY_POINTS: usize = 100;

/// A single (time, price) observation of the primary metal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistorySample {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

impl HistorySample {
    pub fn new(timestamp: DateTime<Utc>, price: Decimal) -> Self {
        Self { timestamp, price }
    }
}

/// Number of samples needed to cover the retention window at the given
/// refresh interval: `max(100, floor(7d / interval) + 1)`.
///
/// A non-positive interval counts as the default 12 s.
pub fn max_history_points(refresh_interval_ms: i64) -> usize {
    let interval = crate::settings::effective_interval_ms(refresh_interval_ms);
    let points = (RETENTION_MS / interval) as usize + 1;
    points.max(MIN_HISTORY_POINTS)
}

/// Trailing chart windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    OneHour,
    SixHours,
    TwentyFourHours,
    SevenDays,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::OneHour,
        TimeRange::SixHours,
        TimeRange::TwentyFourHours,
        TimeRange::SevenDays,
    ];

    pub fn duration(&self) -> Duration {
        match self {
            TimeRange::OneHour => Duration::hours(1),
            TimeRange::SixHours => Duration::hours(6),
            TimeRange::TwentyFourHours => Duration::hours(24),
            TimeRange::SevenDays => Duration::days(7),
        }
    }

    /// Oldest instant (inclusive) shown for this window.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::OneHour => "1h",
            TimeRange::SixHours => "6h",
            TimeRange::TwentyFourHours => "24h",
            TimeRange::SevenDays => "7d",
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
