// ABOUTME: `swatch fallbacks` pipeline: gather palette sources, synthesize, write or check
// ABOUTME: The output file is always regenerated whole, never patched

use std::path::Path;

use anyhow::{Context, Result};
use swatch_color::{FallbackSheet, PaletteSource, synthesize};
use swatch_logging::PerfTimer;

use crate::config::SwatchConfig;
use crate::store::{TokenStore, with_extension};

/// Result of comparing a freshly generated sheet with the file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    UpToDate,
    Stale,
    Missing,
}

/// Palette sources in output order.
///
/// Configured names map to `<directory>/<name>.css`; without a list, every
/// `*.css` file in the directory is used alphabetically. An unreadable
/// palette file is logged and left out.
pub fn collect_palette_sources(
    config: &SwatchConfig,
    store: &dyn TokenStore,
) -> Result<Vec<PaletteSource>> {
    let directory = config.resolve(&config.fallbacks.directory);

    let names: Vec<String> = match &config.fallbacks.palettes {
        Some(names) => names.clone(),
        None => {
            let files = store
                .list(&directory)
                .with_context(|| format!("Failed to list palettes in {}", directory.display()))?;
            with_extension(&files, "css")
                .into_iter()
                .filter_map(|file| {
                    Path::new(&file)
                        .file_stem()
                        .and_then(|stem| stem.to_str())
                        .map(str::to_string)
                })
                .collect()
        }
    };

    let mut sources = Vec::with_capacity(names.len());
    for name in names {
        let file = format!("{name}.css");
        let origin = config.fallbacks.directory.join(&file).display().to_string();
        match store.read(&directory.join(&file)) {
            Ok(css) => sources.push(PaletteSource::new(name, origin, css)),
            Err(err) => swatch_logging::error!(
                palette = %name,
                origin = %origin,
                error = %err,
                "Skipping unreadable palette file"
            ),
        }
    }

    Ok(sources)
}

pub fn generate(config: &SwatchConfig, store: &dyn TokenStore) -> Result<FallbackSheet> {
    let _timer = PerfTimer::new("generate_fallbacks").with_warn_threshold(crate::SLOW_STAGE);
    let sources = collect_palette_sources(config, store)?;
    let sheet = synthesize(&sources);

    swatch_logging::info!(
        palettes = sheet.palettes.len(),
        properties = sheet.property_count(),
        skipped = sheet.skipped_count(),
        "Generated palette fallbacks"
    );
    Ok(sheet)
}

pub fn freshness(rendered: &str, store: &dyn TokenStore, output: &Path) -> Freshness {
    match store.read(output) {
        Ok(existing) if existing == rendered => Freshness::UpToDate,
        Ok(_) => Freshness::Stale,
        Err(_) => Freshness::Missing,
    }
}

/// Overwrite `output` with `rendered`, creating parent directories
pub fn write_output(output: &Path, rendered: &str) -> Result<()> {
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(output, rendered)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    swatch_logging::info!(output = %output.display(), bytes = rendered.len(), "Wrote fallback stylesheet");
    Ok(())
}
