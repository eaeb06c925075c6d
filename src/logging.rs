//! `tracing` subscriber setup: console plus an append-only log file.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "bullion_watch=info";

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub default_filter: String,
    /// Mirror events to stderr.
    pub console: bool,
    /// Append events to this file. Skipped if it cannot be opened.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_filter: DEFAULT_FILTER.to_string(),
            console: true,
            file: default_log_path(),
        }
    }
}

/// `<per-user config dir>/GoldPriceMonitor/logs/startup.log`.
pub fn default_log_path() -> Option<PathBuf> {
    crate::settings::app_data_dir().map(|d| d.join("logs").join("startup.log"))
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let console_layer = config
        .console
        .then(|| fmt::layer().with_writer(std::io::stderr));

    let file_layer = config.file.as_deref().and_then(open_append).map(|file| {
        fmt::layer()
            .with_ansi(false)
            .log_internal_errors(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
}

fn open_append(path: &Path) -> Option<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}
