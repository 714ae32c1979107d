// ABOUTME: Logging configuration with environment overrides for level, JSON output and log file
// ABOUTME: SWATCH_LOG beats RUST_LOG; levels serialize as lowercase names

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::Level;

/// Global level, e.g. `SWATCH_LOG=debug`
pub const LEVEL_VAR: &str = "SWATCH_LOG";
/// Fallback level or `module=level` directives
pub const RUST_LOG_VAR: &str = "RUST_LOG";
/// Any value other than `0`/`false` switches console output to JSON lines
pub const JSON_VAR: &str = "SWATCH_LOG_JSON";
/// Enables file output; a non-empty value replaces the default path
pub const FILE_VAR: &str = "SWATCH_LOG_FILE";

/// `tracing::Level` with serde support
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel(pub Level);

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel(Level::INFO)
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_log_level(s).map(LogLevel)
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string().to_ascii_lowercase())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        LogLevel(level)
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        level.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,

    /// Per-target overrides such as `swatch_color = "debug"`
    pub module_levels: BTreeMap<String, LogLevel>,

    pub output: OutputConfig,

    pub file: FileConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Human-readable or JSON output on stderr
    pub console: bool,
    pub file: bool,
    pub json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            console: true,
            file: false,
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub path: PathBuf,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            path: default_log_file_path(),
        }
    }
}

impl LoggingConfig {
    /// Defaults with the process environment applied
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`, so tests need not touch the environment.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        match (lookup(LEVEL_VAR), lookup(RUST_LOG_VAR)) {
            (Some(level), _) => {
                self.level = level
                    .parse()
                    .with_context(|| format!("{LEVEL_VAR} is not a log level"))?;
            }
            (None, Some(directives)) => self.apply_directives(&directives)?,
            (None, None) => {}
        }

        if let Some(flag) = lookup(JSON_VAR) {
            self.output.json = is_enabled(&flag);
        }

        if let Some(path) = lookup(FILE_VAR) {
            self.output.file = true;
            if !path.trim().is_empty() {
                self.file.path = PathBuf::from(path);
            }
        }

        Ok(())
    }

    /// `info` sets the global level; `swatch_tokens=trace` sets one target's level
    fn apply_directives(&mut self, directives: &str) -> Result<()> {
        for directive in directives.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.split_once('=') {
                Some((target, level)) => {
                    let level = level
                        .parse()
                        .with_context(|| format!("Bad level in {RUST_LOG_VAR} directive `{directive}`"))?;
                    self.module_levels.insert(target.trim().to_string(), level);
                }
                None => {
                    self.level = directive
                        .parse()
                        .with_context(|| format!("Bad level in {RUST_LOG_VAR}: `{directive}`"))?;
                }
            }
        }
        Ok(())
    }
}

fn is_enabled(flag: &str) -> bool {
    !matches!(flag.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off")
}

/// `<cache dir>/swatch/swatch.log`, or the temp dir when no cache dir is known
fn default_log_file_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("swatch")
        .join("swatch.log")
}

/// Parse a level name, case-insensitively; `warning` is accepted for `warn`.
pub fn parse_log_level(text: &str) -> Result<Level> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("warning") {
        return Ok(Level::WARN);
    }
    text.parse::<Level>().map_err(|_| {
        anyhow!("Invalid log level `{text}`; expected trace, debug, info, warn or error")
    })
}
