// ABOUTME: Legacy RGB fallback synthesis for OKLCH palettes
// ABOUTME: Resolves each palette block in declaration order and renders one @supports guard

use std::collections::{HashMap, HashSet};

use swatch_tokens::{TokenError, find_rule_block, scan_declarations};

use crate::color_mix::ColorRef;
use crate::convert::{Rgb8, oklch_to_srgb};
use crate::error::{ColorError, Result};
use crate::oklch::Oklch;

pub const GENERATED_BANNER: &str =
    "/* DO NOT EDIT: auto-generated by `swatch fallbacks` from the OKLCH palette sources */";

/// Feature query that is true only in browsers without OKLCH support
pub const SUPPORTS_GUARD: &str = "@supports not (color: oklch(0% 0 0))";

/// Keywords that begin a color value the synthesizer understands
const COLOR_PREFIXES: [&str; 6] = [
    "oklch(",
    "color-mix(",
    "var(",
    "white",
    "black",
    "transparent",
];

/// One palette stylesheet to synthesize from
#[derive(Debug, Clone)]
pub struct PaletteSource {
    /// Palette class name, e.g. `arctic` for `:root.arctic`
    pub name: String,
    /// File the CSS came from, for diagnostics
    pub origin: String,
    pub css: String,
}

impl PaletteSource {
    pub fn new(name: impl Into<String>, origin: impl Into<String>, css: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: origin.into(),
            css: css.into(),
        }
    }

    pub fn selector(&self) -> String {
        palette_selector(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallbackProperty {
    pub name: String,
    pub color: Oklch,
    pub rgb: Rgb8,
}

/// A color property that could not be resolved and was left out
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedProperty {
    pub name: String,
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaletteFallback {
    pub name: String,
    pub properties: Vec<FallbackProperty>,
    pub skipped: Vec<SkippedProperty>,
}

impl PaletteFallback {
    pub fn get(&self, name: &str) -> Option<&FallbackProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    fn record(&mut self, property: FallbackProperty) {
        match self.properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
    }
}

/// All palette fallbacks of one generation run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FallbackSheet {
    pub palettes: Vec<PaletteFallback>,
}

impl FallbackSheet {
    pub fn property_count(&self) -> usize {
        self.palettes.iter().map(|p| p.properties.len()).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.palettes.iter().map(|p| p.skipped.len()).sum()
    }

    /// Render the complete generated stylesheet.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(GENERATED_BANNER);
        out.push_str("\n\n");
        out.push_str(SUPPORTS_GUARD);
        out.push_str(" {\n");

        for (index, palette) in self.palettes.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str("  ");
            out.push_str(&palette_selector(&palette.name));
            out.push_str(" {\n");
            for property in &palette.properties {
                out.push_str(&format!("    --{}: {};\n", property.name, property.rgb));
            }
            out.push_str("  }\n");
        }

        out.push_str("}\n");
        out
    }
}

pub fn palette_selector(name: &str) -> String {
    format!(":root.{name}")
}

/// Resolve every color property of one palette's `:root.<name>` block.
///
/// Properties are resolved top to bottom, each against the colors resolved
/// so far, so forward and cyclic references fail as unresolved. Failed
/// properties are recorded as skipped and logged; values that are not
/// colors at all are ignored.
pub fn synthesize_palette(source: &PaletteSource) -> Result<PaletteFallback> {
    let selector = source.selector();
    let block = find_rule_block(&source.css, &selector, &source.origin)?
        .ok_or_else(|| TokenError::rule_block_not_found(&source.origin, &selector))?;

    let declarations = scan_declarations(&block.top_level_body(), &source.origin)?;
    let mut fallback = PaletteFallback {
        name: source.name.clone(),
        ..Default::default()
    };
    let mut resolved: HashMap<String, Oklch> = HashMap::new();
    let mut non_colors: HashSet<String> = HashSet::new();

    for declaration in declarations {
        let line = block.start_line + declaration.line - 1;

        if !looks_like_color(&declaration.value) {
            swatch_logging::debug!(
                palette = %source.name,
                property = %declaration.name,
                "Skipping non-color property"
            );
            non_colors.insert(declaration.name);
            continue;
        }

        let outcome = ColorRef::parse(&declaration.value).and_then(|color| {
            if let ColorRef::Var {
                name,
                fallback: None,
            } = &color
                && non_colors.contains(name)
            {
                return Ok(None);
            }
            color.resolve(&resolved).map(Some)
        });

        match outcome {
            Ok(Some(color)) => {
                resolved.insert(declaration.name.clone(), color);
                fallback.record(FallbackProperty {
                    name: declaration.name,
                    rgb: oklch_to_srgb(&color),
                    color,
                });
            }
            Ok(None) => {
                swatch_logging::debug!(
                    palette = %source.name,
                    property = %declaration.name,
                    "Skipping alias of a non-color property"
                );
                non_colors.insert(declaration.name);
            }
            Err(err) => {
                swatch_logging::warn!(
                    palette = %source.name,
                    origin = %source.origin,
                    property = %declaration.name,
                    line,
                    error = %err,
                    "Skipping fallback for unresolvable color"
                );
                // A stale earlier value must not satisfy later references
                resolved.remove(&declaration.name);
                fallback.properties.retain(|p| p.name != declaration.name);
                fallback.skipped.push(SkippedProperty {
                    name: declaration.name,
                    line,
                    reason: err.to_string(),
                });
            }
        }
    }

    swatch_logging::debug!(
        palette = %source.name,
        properties = fallback.properties.len(),
        skipped = fallback.skipped.len(),
        "Synthesized palette fallback"
    );
    Ok(fallback)
}

/// Synthesize every palette in order; a palette that fails as a whole is
/// logged and left out of the sheet.
pub fn synthesize(sources: &[PaletteSource]) -> FallbackSheet {
    let palettes = sources
        .iter()
        .filter_map(|source| match synthesize_palette(source) {
            Ok(palette) => Some(palette),
            Err(err) => {
                log_palette_failure(source, &err);
                None
            }
        })
        .collect();

    FallbackSheet { palettes }
}

fn log_palette_failure(source: &PaletteSource, err: &ColorError) {
    swatch_logging::error!(
        palette = %source.name,
        origin = %source.origin,
        error = %err,
        "Skipping palette fallback"
    );
}

fn looks_like_color(value: &str) -> bool {
    let value = value.trim();
    COLOR_PREFIXES.iter().any(|prefix| {
        value
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}
