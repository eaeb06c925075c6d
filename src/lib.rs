//! # Bullion Watch
//!
//! Periodic London gold and silver spot quotes, with gold re-priced in CNY
//! per gram and a rolling seven-day price history.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core**: Newtypes, unit conversion, formatting, display records and
//!    price history (no I/O)
//! 2. **Settings & logging**: JSON settings file and `tracing` setup
//! 3. **HTTP API**: `QuoteHttp`, one method per endpoint, no retries
//! 4. **High-Level Client**: `MetalsClient` with its quote sub-client
//! 5. **Monitor**: refresh pipeline and the background refresh loop
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bullion_watch::prelude::*;
//! use std::sync::Arc;
//!
//! let settings = SettingsStore::default_location()?.load(&Settings::default());
//! let client = MetalsClient::from_settings(&settings)?;
//! let mut monitor = Monitor::new(Arc::new(client), settings).spawn();
//!
//! let mut snapshots = monitor.subscribe();
//! snapshots.changed().await?;
//! println!("{}", snapshots.borrow().cny_gold.formatted_price);
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes, unit conversion and number formatting.
pub mod shared;

/// Domain modules (vertical slices): quotes, display records, history.
pub mod domain;

/// Unified error types.
pub mod error;

/// Endpoint constants.
pub mod network;

// ── Layer 2: Settings & logging ──────────────────────────────────────────────

/// Persisted user settings.
pub mod settings;

/// `tracing` subscriber setup.
pub mod logging;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client for the quote API.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `MetalsClient`: the quote API entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Layer 5: Monitor ─────────────────────────────────────────────────────────

/// Refresh pipeline and refresh loop.
pub mod monitor;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared
    pub use crate::shared::{InstrumentCode, UnitConverter};

    // Domain types
    pub use crate::domain::display::DisplayRecord;
    pub use crate::domain::history::{HistorySample, PriceHistory, TimeRange};
    pub use crate::domain::quote::Quote;

    // Settings
    pub use crate::settings::{Settings, SettingsStore};

    // Monitor
    pub use crate::monitor::{
        Monitor, MonitorHandle, MonitorSnapshot, MonitorState, QuoteSource,
    };

    // Client
    #[cfg(feature = "http")]
    pub use crate::client::MetalsClient;

    // Errors
    pub use crate::error::{ConversionError, HttpError, MonitorError, SettingsError};
}
