//! Unified error types.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Quote API error {code}: {msg}")]
    Api { code: i64, msg: String },

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Refresh loop is not running")]
    NotRunning,
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,
}

/// Price conversion errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Arithmetic overflow converting {0}")]
    Overflow(String),

    #[error("Division by zero")]
    DivisionByZero,
}

/// Settings persistence errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed settings file: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("No per-user data directory available")]
    NoDataDir,
}
