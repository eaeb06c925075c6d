//! Price monitor: refresh pipeline, rolling history and the refresh loop.
//!
//! The loop task owns [`MonitorState`] and is the only writer. Consumers read
//! [`MonitorSnapshot`]s published over a `tokio::sync::watch` channel and
//! drive the loop with triggers on a [`MonitorHandle`].

pub mod pipeline;
pub mod scheduler;

pub use pipeline::{apply_quotes, refresh_once, CycleReport};
pub use scheduler::{cancellation, CancelHandle, CancelSignal, Monitor, MonitorHandle, Scheduler};

use crate::domain::display::{self, DisplayRecord};
use crate::domain::history::{HistorySample, PriceHistory, SharedHistory, TimeRange};
use crate::domain::quote::Quote;
use crate::shared::InstrumentCode;

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use rust_decimal::Decimal;
use std::sync::RwLockWriteGuard;

pub const STATUS_LOADING: &str = "Loading data...";
pub const STATUS_UPDATED: &str = "Data updated";
pub const LAST_UPDATE_PENDING: &str = "Waiting for data...";

/// Anything that can produce a spot quote. Implementations fail soft: every
/// error becomes `None`.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quote(&self, code: &InstrumentCode) -> Option<Quote>;

    /// Called when the live settings carry a different API token.
    async fn set_api_token(&self, _token: &str) {}
}

/// Last seen native prices, used as the baseline for the converted change.
///
/// Zero means "not seen yet"; the first observed price seeds it, so the first
/// reported converted change is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviousPrices {
    pub gold: Decimal,
    pub silver: Decimal,
}

impl PreviousPrices {
    /// Baseline for a new gold price, seeded with it if still unset.
    pub fn gold_baseline(&self, current: Decimal) -> Decimal {
        if self.gold.is_zero() {
            current
        } else {
            self.gold
        }
    }
}

/// Everything the refresh loop mutates.
#[derive(Debug)]
pub struct MonitorState {
    pub london_gold: DisplayRecord,
    pub london_silver: DisplayRecord,
    pub cny_gold: DisplayRecord,
    pub previous: PreviousPrices,
    history: SharedHistory,
    last_update: Option<DateTime<Local>>,
    status: String,
    is_loading: bool,
    cycles: u64,
}

impl MonitorState {
    pub fn new(max_history_points: usize) -> Self {
        Self {
            london_gold: DisplayRecord::new(display::LONDON_GOLD),
            london_silver: DisplayRecord::new(display::LONDON_SILVER),
            cny_gold: DisplayRecord::new(display::CNY_GOLD),
            previous: PreviousPrices::default(),
            history: SharedHistory::new(max_history_points),
            last_update: None,
            status: STATUS_LOADING.to_string(),
            is_loading: false,
            cycles: 0,
        }
    }

    pub fn history(&self) -> &SharedHistory {
        &self.history
    }

    /// Write access to the history; published snapshots see the change.
    pub(crate) fn history_mut(&mut self) -> RwLockWriteGuard<'_, PriceHistory> {
        self.history.write()
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Completed cycles, successful or not.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub(crate) fn begin_cycle(&mut self) {
        self.is_loading = true;
    }

    /// A cycle ran to the end, possibly with per-instrument failures.
    pub(crate) fn complete_cycle(&mut self, at: DateTime<Local>) {
        self.last_update = Some(at);
        self.status = STATUS_UPDATED.to_string();
        self.is_loading = false;
        self.cycles += 1;
    }

    /// A cycle was aborted by an error; the last-update time stays stale.
    pub(crate) fn fail_cycle(&mut self, message: impl std::fmt::Display) {
        self.status = format!("Error: {}", message);
        self.is_loading = false;
        self.cycles += 1;
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            london_gold: self.london_gold.clone(),
            london_silver: self.london_silver.clone(),
            cny_gold: self.cny_gold.clone(),
            history: self.history.clone(),
            last_update: self.last_update,
            status: self.status.clone(),
            is_loading: self.is_loading,
            cycles: self.cycles,
        }
    }
}

/// Read-only view handed to the presentation layer.
///
/// Display fields are frozen at publish time. `history` is the live shared
/// buffer, so it may already hold samples from a later cycle.
#[derive(Debug, Clone)]
pub struct MonitorSnapshot {
    pub london_gold: DisplayRecord,
    pub london_silver: DisplayRecord,
    pub cny_gold: DisplayRecord,
    pub history: SharedHistory,
    pub last_update: Option<DateTime<Local>>,
    pub status: String,
    pub is_loading: bool,
    pub cycles: u64,
}

impl MonitorSnapshot {
    /// `HH:MM:SS` of the last completed cycle.
    pub fn last_update_text(&self) -> String {
        match self.last_update {
            Some(t) => t.format("%H:%M:%S").to_string(),
            None => LAST_UPDATE_PENDING.to_string(),
        }
    }

    pub fn history_since(&self, since: DateTime<Utc>) -> Vec<HistorySample> {
        self.history.query(since)
    }

    pub fn history_window(&self, range: TimeRange, now: DateTime<Utc>) -> Vec<HistorySample> {
        self.history.window(range, now)
    }
}
