use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LogSettings, default_state_dir};

/// Send `tracing` output to a daily-rolling `tapedeck.log`; the terminal
/// belongs to the UI. Keep the returned guard alive until exit so buffered
/// lines get flushed.
pub fn init_logging(settings: &LogSettings) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let log_dir = settings
        .directory
        .clone()
        .or_else(|| default_state_dir().map(|d| d.join("logs")))
        .ok_or("no log directory: set logging.directory or HOME")?;
    fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "tapedeck.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG wins over the configured level.
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&settings.level))?;

    tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| e.to_string())?;

    Ok(guard)
}
