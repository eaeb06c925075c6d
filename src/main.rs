use bullion_watch::client::MetalsClient;
use bullion_watch::domain::display::DisplayRecord;
use bullion_watch::error::{MonitorError, SettingsError};
use bullion_watch::logging::{self, LogConfig};
use bullion_watch::monitor::{self, Monitor, MonitorSnapshot, MonitorState};
use bullion_watch::settings::{parse_refresh_interval_secs, Settings, SettingsStore};
use bullion_watch::shared::UnitConverter;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "London gold and silver spot prices, with gold in CNY per gram", long_about = None)]
struct Cli {
    /// Quote API token (overrides the stored one)
    #[arg(long, env = "ITICK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Refresh interval in whole seconds; invalid values mean 5
    #[arg(long)]
    interval_secs: Option<String>,

    /// Settings file (default: per-user config dir)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Run a single refresh cycle and exit
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Write the effective settings back to the settings file
    #[arg(long, default_value_t = false)]
    save: bool,

    /// Do not write the log file
    #[arg(long, default_value_t = false)]
    no_log_file: bool,
}

#[tokio::main]
async fn main() -> Result<(), MonitorError> {
    let cli = Cli::parse();

    let log_config = LogConfig {
        file: if cli.no_log_file { None } else { logging::default_log_path() },
        ..LogConfig::default()
    };
    logging::init(&log_config);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting");

    let store = match cli.settings.clone() {
        Some(path) => Some(SettingsStore::new(path)),
        None => match SettingsStore::default_location() {
            Ok(store) => Some(store),
            Err(SettingsError::NoDataDir) => {
                tracing::warn!("No per-user config directory, settings will not persist");
                None
            }
            Err(e) => return Err(e.into()),
        },
    };

    let defaults = Settings::default();
    let mut settings = store
        .as_ref()
        .map(|s| s.load(&defaults))
        .unwrap_or_else(|| defaults.clone());
    if let Some(token) = cli.token {
        settings.api_token = token;
    }
    if let Some(text) = cli.interval_secs.as_deref() {
        settings.refresh_interval_ms = parse_refresh_interval_secs(text);
    }
    save_if_requested(cli.save, store.as_ref(), &settings);
    if !settings.has_api_token() {
        tracing::warn!("No API token configured, quote requests will likely be rejected");
    }

    let client = MetalsClient::from_settings(&settings)?;

    if cli.once {
        let mut state = MonitorState::new(settings.max_history_points());
        monitor::refresh_once(&client, &mut state, &UnitConverter::default(), &settings).await?;
        print_snapshot(&state.snapshot());
        return Ok(());
    }

    let mut handle = Monitor::new(Arc::new(client), settings).spawn();
    let mut snapshots = handle.subscribe();

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if !snapshot.is_loading {
                    print_snapshot(&snapshot);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    if let Some(state) = handle.stop().await {
        tracing::info!(cycles = state.cycles(), samples = state.history().len(), "Stopped");
    }
    save_if_requested(cli.save, store.as_ref(), &handle.settings());
    Ok(())
}

/// `--save`: write the settings. A failure is logged, not returned.
fn save_if_requested(save: bool, store: Option<&SettingsStore>, settings: &Settings) {
    if let (true, Some(store)) = (save, store) {
        store.save_or_log(settings);
    }
}

fn print_snapshot(snapshot: &MonitorSnapshot) {
    println!(
        "[{}] {} | {} | {} | {}",
        snapshot.last_update_text(),
        record_text(&snapshot.london_gold),
        record_text(&snapshot.london_silver),
        record_text(&snapshot.cny_gold),
        snapshot.status
    );
}

fn record_text(record: &DisplayRecord) -> String {
    format!(
        "{} {} {}",
        record.name, record.formatted_price, record.formatted_change
    )
}
