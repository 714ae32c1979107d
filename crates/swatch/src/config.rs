// ABOUTME: Validation plan and fallback configuration loaded from swatch.toml
// ABOUTME: Every field has a default so a missing file yields the built-in plan

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use swatch_tokens::TokenFormat;
use swatch_types::Category;

/// Configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "swatch.toml";

/// Default location of the generated fallback stylesheet, relative to the root
pub const DEFAULT_FALLBACK_OUTPUT: &str = "styles/generated/palette-fallbacks.css";

/// On-disk format of a category's token files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    #[default]
    Json,
    Css,
}

impl From<SourceFormat> for TokenFormat {
    fn from(format: SourceFormat) -> Self {
        match format {
            SourceFormat::Json => TokenFormat::Json,
            SourceFormat::Css => TokenFormat::Css,
        }
    }
}

/// How one category's files are paired and compared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub category: Category,

    /// Directory holding the category's token files, relative to the root
    pub directory: PathBuf,

    /// Source-of-truth file name; the first file alphabetically when absent
    #[serde(default)]
    pub source: Option<String>,

    /// Files compared against the source; every other file when absent
    #[serde(default)]
    pub targets: Option<Vec<String>>,

    #[serde(default)]
    pub format: SourceFormat,

    #[serde(default)]
    pub check_descriptions: bool,
}

impl CategorySpec {
    pub fn token_format(&self) -> TokenFormat {
        self.format.into()
    }
}

/// Fallback stylesheet generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Palette names in output order; every `*.css` file alphabetically when absent
    #[serde(default)]
    pub palettes: Option<Vec<String>>,

    #[serde(default = "default_palette_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_fallback_output")]
    pub output: PathBuf,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            palettes: None,
            directory: default_palette_directory(),
            output: default_fallback_output(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwatchConfig {
    /// Project root that category and fallback paths are relative to
    #[serde(default = "default_root")]
    pub root: PathBuf,

    #[serde(default = "default_categories")]
    pub categories: Vec<CategorySpec>,

    #[serde(default)]
    pub fallbacks: FallbackConfig,
}

impl Default for SwatchConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            categories: default_categories(),
            fallbacks: FallbackConfig::default(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_palette_directory() -> PathBuf {
    PathBuf::from("styles/palettes")
}

fn default_fallback_output() -> PathBuf {
    PathBuf::from(DEFAULT_FALLBACK_OUTPUT)
}

/// Built-in plan: light/dark modes with descriptions, themes and palettes without
fn default_categories() -> Vec<CategorySpec> {
    vec![
        CategorySpec {
            category: Category::Modes,
            directory: PathBuf::from("tokens/semantic"),
            source: Some("light.json".to_string()),
            targets: Some(vec!["dark.json".to_string()]),
            format: SourceFormat::Json,
            check_descriptions: true,
        },
        CategorySpec {
            category: Category::Themes,
            directory: PathBuf::from("tokens/themes"),
            source: Some("dusk.json".to_string()),
            targets: None,
            format: SourceFormat::Json,
            check_descriptions: false,
        },
        CategorySpec {
            category: Category::Palettes,
            directory: PathBuf::from("styles/palettes"),
            source: Some("arctic.css".to_string()),
            targets: None,
            format: SourceFormat::Css,
            check_descriptions: false,
        },
    ]
}

impl SwatchConfig {
    /// Load `explicit` if given, else `swatch.toml` in `working_dir`, else defaults.
    ///
    /// A relative `explicit` path is taken from `working_dir`. A relative
    /// `root` is resolved against the directory of the file it
    /// was read from (or `working_dir` for the built-in defaults).
    pub fn load(explicit: Option<&Path>, working_dir: &Path) -> anyhow::Result<Self> {
        let discovered = working_dir.join(CONFIG_FILE_NAME);
        let path = match explicit {
            Some(path) => Some(working_dir.join(path)),
            None if discovered.exists() => Some(discovered),
            None => None,
        };

        let mut config = match &path {
            Some(path) => {
                swatch_logging::info!(config_path = %path.display(), "Loading configuration");
                Self::from_file(path)?
            }
            None => {
                swatch_logging::info!(
                    working_dir = %working_dir.display(),
                    "No configuration file found, using built-in plan"
                );
                Self::default()
            }
        };

        let base = path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| working_dir.to_path_buf());
        if config.root.is_relative() {
            config.root = base.join(&config.root);
        }

        config
            .validate()
            .map_err(|reason| anyhow::anyhow!("Invalid configuration: {reason}"))?;

        swatch_logging::debug!(
            root = %config.root.display(),
            categories = config.categories.len(),
            "Configuration ready"
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.categories.is_empty() {
            return Err("at least one category must be configured".to_string());
        }

        let mut seen = HashSet::new();
        for spec in &self.categories {
            if !seen.insert(spec.category) {
                return Err(format!("category `{}` is configured twice", spec.category));
            }
            if spec.source.as_deref().is_some_and(|s| s.trim().is_empty()) {
                return Err(format!("category `{}` has an empty source name", spec.category));
            }
            if spec
                .targets
                .as_ref()
                .is_some_and(|targets| targets.iter().any(|t| t.trim().is_empty()))
            {
                return Err(format!("category `{}` has an empty target name", spec.category));
            }
        }

        if self
            .fallbacks
            .palettes
            .as_ref()
            .is_some_and(|names| names.iter().any(|n| n.trim().is_empty()))
        {
            return Err("fallback palette names must not be empty".to_string());
        }

        Ok(())
    }

    /// Resolve a configured path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    pub fn fallback_output(&self) -> PathBuf {
        self.resolve(&self.fallbacks.output)
    }
}
