// ABOUTME: Installs the process-wide subscriber from a LoggingConfig
// ABOUTME: The returned guard must outlive all logging when file output is on

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{prelude::*, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::layers::{BoxedLayer, create_console_layer, create_env_filter, create_file_layer};

/// Flushes the file writer when dropped
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file_writer: Option<WorkerGuard>,
}

/// Install the process-wide subscriber and return the guard.
///
/// Errors when a global subscriber is already set.
pub fn init_subscriber(config: LoggingConfig) -> Result<LoggingGuard> {
    let filter = create_env_filter(&config).context("Failed to build the level filter")?;
    let (layers, file_guard) = build_layers(&config)?;

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    tracing::debug!(
        level = %config.level.0,
        console = config.output.console,
        json = config.output.json,
        log_file = ?file_guard.as_ref().map(|_| config.file.path.display().to_string()),
        "Swatch logging initialized"
    );

    Ok(LoggingGuard { _file_writer: file_guard })
}

fn build_layers(config: &LoggingConfig) -> Result<(Vec<BoxedLayer>, Option<WorkerGuard>)> {
    let mut layers: Vec<BoxedLayer> = create_console_layer(&config.output).into_iter().collect();

    if !config.output.file {
        return Ok((layers, None));
    }
    let (file_layer, guard) =
        create_file_layer(&config.file).context("Failed to open the log file")?;
    layers.push(file_layer);
    Ok((layers, Some(guard)))
}
