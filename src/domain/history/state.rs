//! Rolling price history buffer.

use super::{HistorySample, TimeRange};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Time-ascending, bounded history of primary-metal samples.
///
/// Appends go to the tail; once the bound is exceeded the oldest samples are
/// evicted from the head. Samples are never edited in place.
#[derive(Debug, Clone)]
pub struct PriceHistory {
    samples: VecDeque<HistorySample>,
    max_points: usize,
}

impl PriceHistory {
    pub fn new(max_points: usize) -> Self {
        Self {
            samples: VecDeque::new(),
            max_points: max_points.max(1),
        }
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Change the bound, evicting from the head if the buffer is now over it.
    pub fn set_max_points(&mut self, max_points: usize) {
        self.max_points = max_points.max(1);
        self.evict();
    }

    /// Push a sample at the tail and trim the head to the bound.
    ///
    /// A timestamp older than the current tail (wall clock stepped back) is
    /// clamped to the tail's, keeping the sequence non-decreasing.
    pub fn append(&mut self, mut sample: HistorySample) {
        if let Some(last) = self.samples.back() {
            if sample.timestamp < last.timestamp {
                tracing::debug!(
                    sample = %sample.timestamp,
                    tail = %last.timestamp,
                    "History sample older than tail, clamping"
                );
                sample.timestamp = last.timestamp;
            }
        }
        self.samples.push_back(sample);
        self.evict();
    }

    /// Samples with `timestamp >= since`, oldest first.
    pub fn query(&self, since: DateTime<Utc>) -> Vec<HistorySample> {
        let start = self.samples.partition_point(|s| s.timestamp < since);
        self.samples.range(start..).copied().collect()
    }

    /// Samples inside a trailing chart window ending at `now`.
    pub fn window(&self, range: TimeRange, now: DateTime<Utc>) -> Vec<HistorySample> {
        self.query(range.cutoff(now))
    }

    pub fn samples(&self) -> &VecDeque<HistorySample> {
        &self.samples
    }

    pub fn latest(&self) -> Option<&HistorySample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn evict(&mut self) {
        while self.samples.len() > self.max_points {
            self.samples.pop_front();
        }
    }
}

// ─── SharedHistory ───────────────────────────────────────────────────────────

/// A [`PriceHistory`] shared between the refresh loop (the only writer) and
/// any number of readers. Clones point at the same buffer, so appends are
/// seen by every holder without copying the samples.
#[derive(Debug, Clone)]
pub struct SharedHistory {
    inner: Arc<RwLock<PriceHistory>>,
}

impl SharedHistory {
    pub fn new(max_points: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(PriceHistory::new(max_points))),
        }
    }

    /// Read access. Keep the guard short; the loop blocks on it to append.
    pub fn read(&self) -> RwLockReadGuard<'_, PriceHistory> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, PriceHistory> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn query(&self, since: DateTime<Utc>) -> Vec<HistorySample> {
        self.read().query(since)
    }

    pub fn window(&self, range: TimeRange, now: DateTime<Utc>) -> Vec<HistorySample> {
        self.read().window(range, now)
    }

    pub fn latest(&self) -> Option<HistorySample> {
        self.read().latest().copied()
    }

    pub fn max_points(&self) -> usize {
        self.read().max_points()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn sample(minutes: i64, price: i64) -> HistorySample {
        HistorySample::new(t0() + Duration::minutes(minutes), Decimal::from(price))
    }

    #[test]
    fn test_append_keeps_order() {
        let mut h = PriceHistory::new(10);
        h.append(sample(0, 1));
        h.append(sample(1, 2));
        h.append(sample(2, 3));
        let prices: Vec<_> = h.samples().iter().map(|s| s.price).collect();
        assert_eq!(prices, [Decimal::from(1), Decimal::from(2), Decimal::from(3)]);
        assert_eq!(h.latest().unwrap().price, Decimal::from(3));
    }

    #[test]
    fn test_overflow_keeps_last_bound_samples() {
        let bound = 5;
        let mut h = PriceHistory::new(bound);
        for i in 0..12 {
            h.append(sample(i, i));
            assert!(h.len() <= bound);
        }
        let prices: Vec<_> = h.samples().iter().map(|s| s.price).collect();
        let expected: Vec<_> = (7..12).map(Decimal::from).collect();
        assert_eq!(prices, expected);
    }

    #[test]
    fn test_shrinking_bound_evicts_from_head() {
        let mut h = PriceHistory::new(10);
        for i in 0..8 {
            h.append(sample(i, i));
        }
        h.set_max_points(3);
        assert_eq!(h.len(), 3);
        assert_eq!(h.samples().front().unwrap().price, Decimal::from(5));
    }

    #[test]
    fn test_query_is_inclusive_of_cutoff() {
        let mut h = PriceHistory::new(100);
        for i in 0..10 {
            h.append(sample(i, i));
        }
        let since = t0() + Duration::minutes(4);
        let got = h.query(since);
        assert_eq!(got.len(), 6);
        assert_eq!(got[0].timestamp, since);
        assert!(h.query(t0() + Duration::minutes(60)).is_empty());
        assert_eq!(h.query(t0() - Duration::days(1)).len(), 10);
    }

    #[test]
    fn test_window_ranges() {
        let now = t0() + Duration::days(8);
        let mut h = PriceHistory::new(100);
        h.append(HistorySample::new(now - Duration::days(8), Decimal::from(1)));
        h.append(HistorySample::new(now - Duration::days(7), Decimal::from(2)));
        h.append(HistorySample::new(now - Duration::hours(20), Decimal::from(3)));
        h.append(HistorySample::new(now - Duration::hours(6), Decimal::from(4)));
        h.append(HistorySample::new(now - Duration::minutes(30), Decimal::from(5)));

        assert_eq!(h.window(TimeRange::OneHour, now).len(), 1);
        assert_eq!(h.window(TimeRange::SixHours, now).len(), 2);
        assert_eq!(h.window(TimeRange::TwentyFourHours, now).len(), 3);
        assert_eq!(h.window(TimeRange::SevenDays, now).len(), 4);
    }

    #[test]
    fn test_clock_step_back_is_clamped() {
        let mut h = PriceHistory::new(10);
        h.append(sample(5, 1));
        h.append(sample(3, 2));
        let ts: Vec<_> = h.samples().iter().map(|s| s.timestamp).collect();
        assert_eq!(ts[0], ts[1]);
        assert_eq!(h.samples()[1].price, Decimal::from(2));
    }

    #[test]
    fn test_shared_history_clones_see_appends() {
        let writer = SharedHistory::new(3);
        let reader = writer.clone();
        for i in 0..5 {
            writer.write().append(sample(i, i));
        }
        assert_eq!(reader.len(), 3);
        assert_eq!(reader.latest().unwrap().price, Decimal::from(4));
        assert_eq!(reader.query(t0() + Duration::minutes(3)).len(), 2);

        writer.write().set_max_points(1);
        assert_eq!(reader.max_points(), 1);
        assert_eq!(reader.read().samples().front().unwrap().price, Decimal::from(4));
    }
}
