//! JSON settings file on disk.

use super::{app_data_dir, PartialSettings, Settings};
use crate::error::SettingsError;
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.json";

/// Loads and saves [`Settings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<per-user config dir>/GoldPriceMonitor/settings.json`.
    pub fn default_location() -> Result<Self, SettingsError> {
        let dir = app_data_dir().ok_or(SettingsError::NoDataDir)?;
        Ok(Self::new(dir.join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file. `Ok(None)` when it does not exist.
    pub fn try_load(&self, defaults: &Settings) -> Result<Option<Settings>, SettingsError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        let partial: PartialSettings = serde_json::from_str(&json)?;
        Ok(Some(partial.resolve(defaults)))
    }

    /// Read the file, falling back to `defaults` when it is missing or
    /// unreadable.
    pub fn load(&self, defaults: &Settings) -> Settings {
        match self.try_load(defaults) {
            Ok(Some(settings)) => {
                tracing::debug!(path = %self.path.display(), "Settings loaded");
                settings
            }
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "No settings file, using defaults");
                defaults.clone()
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read settings, using defaults");
                defaults.clone()
            }
        }
    }

    /// Write the file as indented JSON, creating the directory if needed.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// [`save`](Self::save), logging instead of returning the error.
    pub fn save_or_log(&self, settings: &Settings) {
        if let Err(e) = self.save(settings) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to save settings");
        }
    }
}
