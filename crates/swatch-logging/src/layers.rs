// ABOUTME: Console, JSON and rolling-file layers plus the level filter
// ABOUTME: Console output goes to stderr so stdout stays reserved for reports

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{FileConfig, LoggingConfig, OutputConfig};

pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Stderr layer, compact or JSON; `None` when console output is off
pub fn create_console_layer(config: &OutputConfig) -> Option<BoxedLayer> {
    if !config.console {
        return None;
    }

    let base = fmt::layer().with_writer(std::io::stderr).with_target(true);
    Some(if config.json {
        base.json().with_current_span(true).boxed()
    } else {
        base.compact().without_time().boxed()
    })
}

/// Non-blocking, daily-rolling file layer.
///
/// The guard flushes the background writer on drop.
pub fn create_file_layer(config: &FileConfig) -> Result<(BoxedLayer, WorkerGuard)> {
    let (directory, file_name) = split_log_path(&config.path)?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let (writer, guard) = non_blocking(rolling::daily(directory, file_name));
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .boxed();

    Ok((layer, guard))
}

fn split_log_path(path: &Path) -> Result<(&Path, &str)> {
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Log file path {} has no file name", path.display()))?;
    Ok((directory, file_name))
}

/// Global level plus one directive per module override
pub fn create_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    config
        .module_levels
        .iter()
        .try_fold(EnvFilter::new(config.level.0.to_string()), |filter, (module, level)| {
            let directive: Directive = format!("{module}={}", level.0)
                .parse()
                .with_context(|| format!("Invalid filter directive for `{module}`"))?;
            Ok(filter.add_directive(directive))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use tempfile::tempdir;
    use tracing::Level;

    #[test]
    fn test_console_layer_follows_output_flags() {
        let compact = OutputConfig::default();
        assert!(create_console_layer(&compact).is_some());

        let json = OutputConfig {
            json: true,
            ..Default::default()
        };
        assert!(create_console_layer(&json).is_some());

        let silent = OutputConfig {
            console: false,
            ..Default::default()
        };
        assert!(create_console_layer(&silent).is_none());
    }

    #[test]
    fn test_file_layer_creates_log_directory() {
        let temp_dir = tempdir().unwrap();
        let config = FileConfig {
            path: temp_dir.path().join("logs").join("swatch.log"),
        };

        assert!(create_file_layer(&config).is_ok());
        assert!(temp_dir.path().join("logs").is_dir());
    }

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path(Path::new("swatch.log")).unwrap();
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, "swatch.log");
        assert!(split_log_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_env_filter_with_module_levels() {
        let mut config = LoggingConfig {
            level: LogLevel(Level::DEBUG),
            ..Default::default()
        };
        config
            .module_levels
            .insert("swatch_tokens".to_string(), LogLevel(Level::TRACE));

        let filter = create_env_filter(&config).unwrap();
        assert!(filter.to_string().contains("swatch_tokens=trace"));
    }
}
