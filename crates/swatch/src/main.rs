// ABOUTME: Entry point for the swatch command line tool
// ABOUTME: Sets up logging from -v and the environment, then runs the selected command

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use swatch::{Cli, EXIT_FATAL, FsTokenStore};
use swatch_logging::config::{LEVEL_VAR, RUST_LOG_VAR};
use swatch_logging::{LoggingConfig, LoggingGuard, error};

fn setup_logging(verbosity: u8) -> Result<LoggingGuard> {
    let mut config =
        LoggingConfig::from_env().context("Failed to create logging config from environment")?;

    // -v wins; without it the environment decides, falling back to warnings only
    let env_level_set = [LEVEL_VAR, RUST_LOG_VAR]
        .iter()
        .any(|var| std::env::var_os(var).is_some());
    if verbosity > 0 || !env_level_set {
        let level = match verbosity {
            0 => swatch_logging::Level::WARN,
            1 => swatch_logging::Level::INFO,
            2 => swatch_logging::Level::DEBUG,
            _3_or_more => swatch_logging::Level::TRACE,
        };
        config.level = level.into();
    }

    swatch_logging::init_subscriber(config).context("Failed to initialize swatch logging")
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match setup_logging(cli.verbose) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("swatch: {err:#}");
            return ExitCode::from(EXIT_FATAL);
        }
    };

    let outcome = std::env::current_dir()
        .context("Failed to determine the working directory")
        .and_then(|working_dir| {
            swatch::run(&cli, &working_dir, &FsTokenStore, &mut std::io::stdout().lock())
        });

    match outcome {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!(error = %format!("{err:#}"), "Swatch run failed");
            eprintln!("swatch: {err:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}
