// ABOUTME: Command line surface of the swatch binary
// ABOUTME: `validate` is the default subcommand; `fallbacks` regenerates or checks the CSS

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::report::ReportMode;

#[derive(Debug, Parser)]
#[command(name = "swatch")]
#[command(about = "Check design token files for consistency and generate OKLCH fallbacks")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run (defaults to validate)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to ./swatch.toml when present)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity, up to three times
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// How much of each mismatch list to print
    #[arg(long, value_enum, default_value_t = ReportMode::Summary, global = true)]
    pub report: ReportMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Compare every configured variant file against its source of truth
    Validate,

    /// Generate legacy RGB fallbacks for the OKLCH palettes
    Fallbacks {
        /// Only report whether the generated file is up to date
        #[arg(long)]
        check: bool,

        /// Output file (overrides the configured path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Validate)
    }
}
