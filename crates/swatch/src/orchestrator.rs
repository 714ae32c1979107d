// ABOUTME: Plan-driven validation of every configured token category
// ABOUTME: A bad source of truth aborts the run; a bad target is recorded and skipped

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use swatch_logging::PerfTimer;
use swatch_tokens::{TokenFormat, extract, validate_pair};
use swatch_types::TokenTree;

use crate::config::{CategorySpec, SwatchConfig};
use crate::report::{FileFailure, Report};
use crate::store::{TokenStore, with_extension};

/// Source and target files chosen for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPlan {
    pub directory: PathBuf,
    pub source: String,
    pub targets: Vec<String>,
}

/// Resolve which files a category compares.
///
/// Listing the directory is only needed when the source or the targets are
/// left to discovery.
pub fn plan_category(
    spec: &CategorySpec,
    config: &SwatchConfig,
    store: &dyn TokenStore,
) -> Result<CategoryPlan> {
    let directory = config.resolve(&spec.directory);
    let extension = spec.token_format().extension();

    let discovered = if spec.source.is_none() || spec.targets.is_none() {
        let files = store
            .list(&directory)
            .with_context(|| format!("Failed to list {} files in {}", spec.category, directory.display()))?;
        with_extension(&files, extension)
    } else {
        Vec::new()
    };

    let source = match &spec.source {
        Some(source) => source.clone(),
        None => match discovered.first() {
            Some(first) => first.clone(),
            None => bail!(
                "No .{extension} files for category `{}` in {}",
                spec.category,
                directory.display()
            ),
        },
    };

    let targets = match &spec.targets {
        Some(targets) => targets.clone(),
        None => discovered.into_iter().filter(|name| *name != source).collect(),
    };

    Ok(CategoryPlan {
        directory,
        source,
        targets,
    })
}

/// Run every category of the plan and collect the outcome.
///
/// Errors are fatal run-level failures: an unlistable directory or an
/// unreadable, unparsable source of truth.
pub fn run_plan(config: &SwatchConfig, store: &dyn TokenStore) -> Result<Report> {
    let _timer = PerfTimer::new("validate_plan").with_warn_threshold(crate::SLOW_STAGE);
    let mut report = Report::new();

    for spec in &config.categories {
        let plan = plan_category(spec, config, store)?;
        let format = spec.token_format();

        swatch_logging::info!(
            category = %spec.category,
            source = %plan.source,
            targets = plan.targets.len(),
            check_descriptions = spec.check_descriptions,
            "Validating category"
        );

        let source_label = display_name(spec, &plan.source);
        let source = load_tree(store, &plan.directory.join(&plan.source), format, &source_label)
            .with_context(|| {
                format!(
                    "Source of truth {source_label} for category `{}` is unusable",
                    spec.category
                )
            })?;

        if plan.targets.is_empty() {
            swatch_logging::warn!(
                category = %spec.category,
                source = %source_label,
                "No target files to compare"
            );
        }

        for target_name in &plan.targets {
            let target_label = display_name(spec, target_name);
            match load_tree(store, &plan.directory.join(target_name), format, &target_label) {
                Ok(target) => {
                    report.push_result(validate_pair(
                        spec.category,
                        &source,
                        &target,
                        spec.check_descriptions,
                    ));
                }
                Err(err) => {
                    swatch_logging::error!(
                        category = %spec.category,
                        file = %target_label,
                        error = %format!("{err:#}"),
                        "Skipping unreadable target file"
                    );
                    report.push_failure(FileFailure {
                        category: spec.category,
                        file: target_label,
                        error: format!("{err:#}"),
                    });
                }
            }
        }
    }

    Ok(report)
}

/// Path as shown in reports: the configured directory joined with the file name
fn display_name(spec: &CategorySpec, file: &str) -> String {
    spec.directory.join(file).display().to_string()
}

fn load_tree(
    store: &dyn TokenStore,
    path: &Path,
    format: TokenFormat,
    origin: &str,
) -> Result<TokenTree> {
    let text = store
        .read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let tree = extract(&text, format, origin)?;
    swatch_logging::debug!(origin = %origin, tokens = tree.len(), "Loaded token file");
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceFormat;
    use crate::store::MemoryTokenStore;
    use swatch_types::Category;

    fn config(categories: Vec<CategorySpec>) -> SwatchConfig {
        SwatchConfig {
            root: PathBuf::from("/project"),
            categories,
            ..Default::default()
        }
    }

    fn themes(source: Option<&str>, targets: Option<Vec<&str>>) -> CategorySpec {
        CategorySpec {
            category: Category::Themes,
            directory: PathBuf::from("tokens/themes"),
            source: source.map(str::to_string),
            targets: targets.map(|t| t.into_iter().map(str::to_string).collect()),
            format: SourceFormat::Json,
            check_descriptions: false,
        }
    }

    fn store() -> MemoryTokenStore {
        MemoryTokenStore::new()
            .with_file(
                "/project/tokens/themes/dusk.json",
                r#"{"radius": {"sm": {"$value": "4px"}}}"#,
            )
            .with_file(
                "/project/tokens/themes/dawn.json",
                r#"{"radius": {"sm": {"$value": "2px"}}}"#,
            )
            .with_file(
                "/project/tokens/themes/ember.json",
                r#"{"radius": {"md": {"$value": "8px"}}}"#,
            )
            .with_file("/project/tokens/themes/notes.txt", "not tokens")
    }

    #[test]
    fn test_plan_discovers_source_and_targets() {
        let spec = themes(None, None);
        let plan = plan_category(&spec, &config(vec![spec.clone()]), &store()).unwrap();
        assert_eq!(plan.source, "dawn.json");
        assert_eq!(plan.targets, vec!["dusk.json", "ember.json"]);
        assert_eq!(plan.directory, PathBuf::from("/project/tokens/themes"));
    }

    #[test]
    fn test_plan_with_configured_source() {
        let spec = themes(Some("dusk.json"), None);
        let plan = plan_category(&spec, &config(vec![spec.clone()]), &store()).unwrap();
        assert_eq!(plan.source, "dusk.json");
        assert_eq!(plan.targets, vec!["dawn.json", "ember.json"]);
    }

    #[test]
    fn test_plan_fully_configured_skips_listing() {
        let spec = themes(Some("dusk.json"), Some(vec!["dawn.json"]));
        let plan = plan_category(&spec, &config(vec![spec.clone()]), &MemoryTokenStore::new())
            .unwrap();
        assert_eq!(plan.targets, vec!["dawn.json"]);
    }

    #[test]
    fn test_run_plan_compares_every_target() {
        let spec = themes(Some("dusk.json"), None);
        let report = run_plan(&config(vec![spec]), &store()).unwrap();

        assert_eq!(report.results().len(), 2);
        assert!(report.results()[0].passed());
        assert!(!report.results()[1].passed());
        assert_eq!(report.results()[1].target_file, "tokens/themes/ember.json");
        assert!(!report.passed());
    }

    #[test]
    fn test_broken_target_is_recorded_and_others_still_run() {
        let spec = themes(Some("dusk.json"), Some(vec!["broken.json", "dawn.json"]));
        let store = store().with_file("/project/tokens/themes/broken.json", "{ nope");
        let report = run_plan(&config(vec![spec]), &store).unwrap();

        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].file, "tokens/themes/broken.json");
        assert_eq!(report.results().len(), 1);
        assert!(report.results()[0].passed());
        assert!(!report.passed());
    }

    #[test]
    fn test_missing_target_is_a_file_failure() {
        let spec = themes(Some("dusk.json"), Some(vec!["gone.json"]));
        let report = run_plan(&config(vec![spec]), &store()).unwrap();
        assert_eq!(report.failures().len(), 1);
        assert!(report.failures()[0].error.contains("Failed to read"));
    }

    #[test]
    fn test_broken_source_aborts_run() {
        let spec = themes(Some("broken.json"), Some(vec!["dawn.json"]));
        let store = store().with_file("/project/tokens/themes/broken.json", "[]");
        let err = run_plan(&config(vec![spec]), &store).unwrap_err();
        assert!(format!("{err:#}").contains("Source of truth tokens/themes/broken.json"));
    }

    #[test]
    fn test_empty_directory_without_source_is_fatal() {
        let spec = CategorySpec {
            category: Category::Palettes,
            directory: PathBuf::from("tokens/themes"),
            source: None,
            targets: None,
            format: SourceFormat::Css,
            check_descriptions: false,
        };
        let err = run_plan(&config(vec![spec]), &store()).unwrap_err();
        assert!(err.to_string().contains("No .css files"));
    }
}
