//! On-disk settings shape: every field optional.

use super::Settings;
use serde::Deserialize;

/// Settings as read from disk. Absent or `null` fields are filled from the
/// defaults passed to [`PartialSettings::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartialSettings {
    pub api_token: Option<String>,
    pub window_left: Option<f64>,
    pub window_top: Option<f64>,
    pub is_window_visible: Option<bool>,
    pub refresh_interval_ms: Option<i64>,
    pub hot_key_enabled: Option<bool>,
}

impl PartialSettings {
    pub fn resolve(self, defaults: &Settings) -> Settings {
        Settings {
            api_token: self.api_token.unwrap_or_else(|| defaults.api_token.clone()),
            window_left: self.window_left.unwrap_or(defaults.window_left),
            window_top: self.window_top.unwrap_or(defaults.window_top),
            is_window_visible: self.is_window_visible.unwrap_or(defaults.is_window_visible),
            refresh_interval_ms: self.refresh_interval_ms.unwrap_or(defaults.refresh_interval_ms),
            hot_key_enabled: self.hot_key_enabled.unwrap_or(defaults.hot_key_enabled),
        }
    }
}
