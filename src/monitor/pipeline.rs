//! One refresh cycle: fetch both metals, derive the CNY figures, fold the
//! results into [`MonitorState`].

use super::{MonitorState, QuoteSource};
use crate::domain::history::HistorySample;
use crate::domain::quote::Quote;
use crate::error::{ConversionError, MonitorError};
use crate::settings::Settings;
use crate::shared::{InstrumentCode, UnitConverter};

use chrono::{DateTime, Local, Utc};
use rust_decimal::Decimal;

/// What a cycle changed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CycleReport {
    /// London Gold and CNY Gold were refreshed.
    pub primary_updated: bool,
    /// London Silver was refreshed.
    pub secondary_updated: bool,
    /// Sample appended to the history, as stored.
    pub sample: Option<HistorySample>,
}

struct ConvertedGold {
    price: Decimal,
    change: Decimal,
    change_percent: Decimal,
}

/// Fetch both instruments concurrently and apply the outcome.
///
/// Per-instrument failures are absorbed (the instrument keeps its old
/// values). Only a conversion failure is returned as an error, and then
/// nothing in `state` has changed, the history bound included.
pub async fn refresh_once(
    source: &dyn QuoteSource,
    state: &mut MonitorState,
    converter: &UnitConverter,
    settings: &Settings,
) -> Result<CycleReport, MonitorError> {
    let gold_code = InstrumentCode::london_gold();
    let silver_code = InstrumentCode::london_silver();

    let (gold, silver) = tokio::join!(
        source.fetch_quote(&gold_code),
        source.fetch_quote(&silver_code)
    );

    if gold.is_none() && silver.is_none() {
        tracing::warn!("No quotes received this cycle");
    }

    let report = apply_quotes(
        state,
        gold,
        silver,
        converter,
        settings.max_history_points(),
        Utc::now(),
    )?;
    state.complete_cycle(Local::now());

    tracing::debug!(
        primary = report.primary_updated,
        secondary = report.secondary_updated,
        history_len = state.history().len(),
        "Refresh cycle complete"
    );
    Ok(report)
}

/// Fold fetched quotes into `state`, bounding the history to
/// `max_history_points`.
///
/// The converted gold figures use the previous gold price as baseline (seeded
/// with the current price when unset), read before the memo is overwritten.
/// All fallible work happens before the first write.
pub fn apply_quotes(
    state: &mut MonitorState,
    gold: Option<Quote>,
    silver: Option<Quote>,
    converter: &UnitConverter,
    max_history_points: usize,
    now: DateTime<Utc>,
) -> Result<CycleReport, ConversionError> {
    let converted = gold
        .as_ref()
        .map(|q| convert_gold(converter, q.last, state.previous.gold_baseline(q.last)))
        .transpose()?;

    let mut report = CycleReport::default();
    state.history_mut().set_max_points(max_history_points);

    if let (Some(quote), Some(cny)) = (gold, converted) {
        state
            .london_gold
            .update(quote.last, quote.change, quote.change_percent);
        state
            .cny_gold
            .update(cny.price, cny.change, cny.change_percent);
        state.previous.gold = quote.last;

        let mut history = state.history_mut();
        history.append(HistorySample::new(now, quote.last));
        report.sample = history.latest().copied();
        report.primary_updated = true;
    }

    if let Some(quote) = silver {
        state
            .london_silver
            .update(quote.last, quote.change, quote.change_percent);
        state.previous.silver = quote.last;
        report.secondary_updated = true;
    }

    Ok(report)
}

fn convert_gold(
    converter: &UnitConverter,
    current: Decimal,
    previous: Decimal,
) -> Result<ConvertedGold, ConversionError> {
    Ok(ConvertedGold {
        price: converter.to_secondary_unit(current)?,
        change: converter.delta(current, previous)?,
        change_percent: converter.delta_percent(current, previous)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::test_support::{quote, StubSource};
    use crate::shared::fmt::PLACEHOLDER;
    use std::str::FromStr;
    use std::time::Duration;

    const GOLD: &str = InstrumentCode::LONDON_GOLD;
    const SILVER: &str = InstrumentCode::LONDON_SILVER;
    const BOUND: usize = 50_401;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn state() -> MonitorState {
        MonitorState::new(Settings::default().max_history_points())
    }

    #[test]
    fn test_first_gold_quote_seeds_baseline() {
        let mut state = state();
        let report = apply_quotes(
            &mut state,
            Some(quote(GOLD, "2000")),
            None,
            &UnitConverter::default(),
            BOUND,
            Utc::now(),
        )
        .unwrap();

        assert!(report.primary_updated);
        assert!(!report.secondary_updated);
        assert_eq!(state.london_gold.formatted_price, "2,000.00");
        assert_eq!(state.london_gold.formatted_change, "▲0.05%");
        assert_eq!(state.cny_gold.formatted_price, "466.19");
        assert_eq!(state.cny_gold.change, Decimal::ZERO);
        assert_eq!(state.cny_gold.formatted_change, "▲0.00%");
        assert_eq!(state.previous.gold, dec("2000"));
        assert_eq!(state.history().len(), 1);
        assert_eq!(report.sample.map(|s| s.price), Some(dec("2000")));
    }

    #[test]
    fn test_second_quote_uses_previous_as_baseline() {
        let mut state = state();
        let converter = UnitConverter::default();
        apply_quotes(&mut state, Some(quote(GOLD, "2000")), None, &converter, BOUND, Utc::now()).unwrap();
        apply_quotes(&mut state, Some(quote(GOLD, "2010")), None, &converter, BOUND, Utc::now()).unwrap();

        let expected_change = converter.delta(dec("2010"), dec("2000")).unwrap();
        assert_eq!(state.cny_gold.change, expected_change);
        assert!(state.cny_gold.is_positive);
        assert_eq!(state.cny_gold.formatted_change, "▲0.50%");
        assert_eq!(state.previous.gold, dec("2010"));
        assert_eq!(state.history().len(), 2);

        apply_quotes(&mut state, Some(quote(GOLD, "1990")), None, &converter, BOUND, Utc::now()).unwrap();
        assert!(!state.cny_gold.is_positive);
        assert!(state.cny_gold.formatted_change.starts_with('▼'));
    }

    #[test]
    fn test_primary_failure_still_updates_secondary() {
        let mut state = state();
        let report = apply_quotes(
            &mut state,
            None,
            Some(quote(SILVER, "24.5")),
            &UnitConverter::default(),
            BOUND,
            Utc::now(),
        )
        .unwrap();

        assert!(!report.primary_updated);
        assert!(report.secondary_updated);
        assert_eq!(report.sample, None);
        assert_eq!(state.london_silver.formatted_price, "24.50");
        assert_eq!(state.london_gold.formatted_price, PLACEHOLDER);
        assert_eq!(state.cny_gold.formatted_price, PLACEHOLDER);
        assert_eq!(state.previous.silver, dec("24.5"));
        assert_eq!(state.previous.gold, Decimal::ZERO);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_primary_failure_keeps_previous_gold_values() {
        let mut state = state();
        let converter = UnitConverter::default();
        apply_quotes(&mut state, Some(quote(GOLD, "2000")), None, &converter, BOUND, Utc::now()).unwrap();
        apply_quotes(&mut state, Some(quote(GOLD, "2010")), None, &converter, BOUND, Utc::now()).unwrap();
        let gold_before = state.london_gold.clone();
        let cny_before = state.cny_gold.clone();
        let history_before = state.history().query(Utc::now() - chrono::Duration::days(1));

        let report = apply_quotes(
            &mut state,
            None,
            Some(quote(SILVER, "25")),
            &converter,
            BOUND,
            Utc::now(),
        )
        .unwrap();

        assert!(!report.primary_updated);
        assert_eq!(state.london_gold, gold_before);
        assert_eq!(state.cny_gold, cny_before);
        assert_eq!(state.cny_gold.formatted_change, "▲0.50%");
        assert_eq!(state.previous.gold, dec("2010"));
        assert_eq!(
            state.history().query(Utc::now() - chrono::Duration::days(1)),
            history_before
        );
        assert_eq!(state.london_silver.formatted_price, "25.00");
    }

    #[tokio::test]
    async fn test_failed_cycle_keeps_history_bound() {
        let mut state = MonitorState::new(1_000);
        let start = Utc::now() - chrono::Duration::hours(1);
        for i in 0..150 {
            state
                .history_mut()
                .append(HistorySample::new(start + chrono::Duration::seconds(i), dec("2000")));
        }
        state.previous.gold = dec("2000");

        let mut huge = quote(GOLD, "0");
        huge.last = Decimal::MAX;
        let source = StubSource::new().always(GOLD, Some(huge));
        let settings = Settings {
            refresh_interval_ms: 86_400_000,
            ..Settings::default()
        };

        let result = refresh_once(&source, &mut state, &UnitConverter::default(), &settings).await;
        assert!(matches!(result, Err(MonitorError::Conversion(_))));
        assert_eq!(state.history().len(), 150);
        assert_eq!(state.history().max_points(), 1_000);
        assert_eq!(state.cycles(), 0);

        let source = StubSource::new().always(GOLD, Some(quote(GOLD, "2001")));
        refresh_once(&source, &mut state, &UnitConverter::default(), &settings)
            .await
            .unwrap();
        assert_eq!(state.history().max_points(), 100);
        assert_eq!(state.history().len(), 100);
    }

    #[test]
    fn test_both_missing_changes_nothing() {
        let mut state = state();
        let before = state.snapshot();
        let report =
            apply_quotes(&mut state, None, None, &UnitConverter::default(), BOUND, Utc::now()).unwrap();
        assert_eq!(report, CycleReport::default());
        assert_eq!(state.london_gold, before.london_gold);
        assert_eq!(state.london_silver, before.london_silver);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_conversion_overflow_leaves_state_untouched() {
        let mut state = state();
        let converter = UnitConverter::default();
        apply_quotes(&mut state, Some(quote(GOLD, "2000")), None, &converter, BOUND, Utc::now()).unwrap();

        let mut huge = quote(GOLD, "0");
        huge.last = Decimal::MAX;
        let err = apply_quotes(
            &mut state,
            Some(huge),
            Some(quote(SILVER, "25")),
            &converter,
            BOUND,
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(err, ConversionError::Overflow(_)));
        assert_eq!(state.previous.gold, dec("2000"));
        assert_eq!(state.previous.silver, Decimal::ZERO);
        assert_eq!(state.london_silver.formatted_price, PLACEHOLDER);
        assert_eq!(state.history().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_once_marks_cycle_complete() {
        let source = StubSource::new()
            .always(GOLD, Some(quote(GOLD, "2000")))
            .always(SILVER, None);
        let mut state = state();

        let report = refresh_once(&source, &mut state, &UnitConverter::default(), &Settings::default())
            .await
            .unwrap();

        assert!(report.primary_updated);
        assert!(!report.secondary_updated);
        assert_eq!(source.calls(), 2);
        assert_eq!(state.status(), crate::monitor::STATUS_UPDATED);
        assert!(state.last_update().is_some());
        assert_eq!(state.cycles(), 1);
    }

    #[tokio::test]
    async fn test_refresh_once_with_no_quotes_still_completes() {
        let source = StubSource::new();
        let mut state = state();
        let report = refresh_once(&source, &mut state, &UnitConverter::default(), &Settings::default())
            .await
            .unwrap();
        assert_eq!(report, CycleReport::default());
        assert!(state.last_update().is_some());
        assert_eq!(state.london_gold.formatted_price, PLACEHOLDER);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_once_fetches_concurrently() {
        let source = StubSource::new()
            .with_delay(Duration::from_secs(5))
            .always(GOLD, Some(quote(GOLD, "2000")))
            .always(SILVER, Some(quote(SILVER, "25")));
        let mut state = state();

        let started = tokio::time::Instant::now();
        refresh_once(&source, &mut state, &UnitConverter::default(), &Settings::default())
            .await
            .unwrap();
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_refresh_once_applies_history_bound_from_settings() {
        let source = StubSource::new().always(GOLD, Some(quote(GOLD, "2000")));
        let mut state = MonitorState::new(5);
        let settings = Settings {
            refresh_interval_ms: 7_000,
            ..Settings::default()
        };
        refresh_once(&source, &mut state, &UnitConverter::default(), &settings)
            .await
            .unwrap();
        assert_eq!(state.history().max_points(), 86_401);
    }
}
