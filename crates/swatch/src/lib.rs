// ABOUTME: Swatch command layer: configuration, validation plan, reporting and fallbacks
// ABOUTME: The binary in main.rs only sets up logging and maps the outcome to an exit code

pub mod cli;
pub mod config;
pub mod fallbacks;
pub mod orchestrator;
pub mod report;
pub mod store;

#[cfg(test)]
mod tests;

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

pub use cli::{Cli, Commands};
pub use config::SwatchConfig;
pub use report::{EXIT_FAILED, EXIT_FATAL, EXIT_PASSED, Report, ReportMode};
pub use store::{FsTokenStore, MemoryTokenStore, TokenStore};

use fallbacks::Freshness;

/// Pipeline stages running longer than this are logged as warnings
pub const SLOW_STAGE: Duration = Duration::from_secs(2);

/// Execute the parsed command and return the exit code.
///
/// Output meant for the user goes to `out`; diagnostics go through logging.
/// An `Err` is a fatal failure that should exit with [`EXIT_FATAL`].
pub fn run(
    cli: &Cli,
    working_dir: &Path,
    store: &dyn TokenStore,
    out: &mut dyn Write,
) -> Result<u8> {
    let config = SwatchConfig::load(cli.config.as_deref(), working_dir)?;

    match cli.command() {
        Commands::Validate => {
            let report = orchestrator::run_plan(&config, store)?;
            write!(out, "{}", report.render(cli.report)).context("Failed to write report")?;
            Ok(report.exit_code())
        }
        Commands::Fallbacks { check, output } => {
            let output = match output {
                Some(path) => working_dir.join(path),
                None => config.fallback_output(),
            };
            let rendered = fallbacks::generate(&config, store)?.render();

            if check {
                let state = fallbacks::freshness(&rendered, store, &output);
                let message = match state {
                    Freshness::UpToDate => "is up to date",
                    Freshness::Stale => "is out of date; run `swatch fallbacks`",
                    Freshness::Missing => "does not exist; run `swatch fallbacks`",
                };
                writeln!(out, "{} {message}", output.display())
                    .context("Failed to write check result")?;
                return Ok(if state == Freshness::UpToDate {
                    EXIT_PASSED
                } else {
                    EXIT_FAILED
                });
            }

            fallbacks::write_output(&output, &rendered)?;
            writeln!(out, "Wrote {}", output.display()).context("Failed to write summary")?;
            Ok(EXIT_PASSED)
        }
    }
}
