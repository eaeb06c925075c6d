//! User settings: API token, refresh interval, window placement.
//!
//! Defaults are an explicit value ([`Settings::default`]) handed to the
//! loader; nothing here reads or writes process-wide state.

mod store;
mod wire;

pub use store::SettingsStore;
pub use wire::PartialSettings;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Per-user application directory name.
pub const APP_DIR_NAME: &str = "GoldPriceMonitor";

/// Interval used wherever the stored one is non-positive.
pub const FALLBACK_REFRESH_INTERVAL_MS: i64 = 12_000;

/// Interval the settings editor falls back to on invalid input.
pub const EDITOR_FALLBACK_INTERVAL_MS: i64 = 5_000;

/// `<per-user config dir>/GoldPriceMonitor`.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME))
}

/// Non-positive intervals count as [`FALLBACK_REFRESH_INTERVAL_MS`].
pub fn effective_interval_ms(refresh_interval_ms: i64) -> i64 {
    if refresh_interval_ms <= 0 {
        FALLBACK_REFRESH_INTERVAL_MS
    } else {
        refresh_interval_ms
    }
}

/// Settings-editor rule for the "refresh every N seconds" box: whole seconds
/// of at least one become milliseconds, anything else becomes 5000 ms.
pub fn parse_refresh_interval_secs(text: &str) -> i64 {
    match text.trim().parse::<i64>() {
        Ok(secs) if secs >= 1 => secs.saturating_mul(1000),
        _ => EDITOR_FALLBACK_INTERVAL_MS,
    }
}

/// Persisted user settings. Field names on disk are PascalCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Settings {
    /// Quote API token; empty means unset.
    pub api_token: String,
    pub window_left: f64,
    pub window_top: f64,
    pub is_window_visible: bool,
    pub refresh_interval_ms: i64,
    pub hot_key_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            window_left: 100.0,
            window_top: 100.0,
            is_window_visible: true,
            refresh_interval_ms: FALLBACK_REFRESH_INTERVAL_MS,
            hot_key_enabled: true,
        }
    }
}

impl Settings {
    pub fn has_api_token(&self) -> bool {
        !self.api_token.is_empty()
    }

    /// Wait between refresh cycles.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(effective_interval_ms(self.refresh_interval_ms) as u64)
    }

    /// Bound for the rolling history at the current interval.
    pub fn max_history_points(&self) -> usize {
        crate::domain::history::max_history_points(self.refresh_interval_ms)
    }
}
