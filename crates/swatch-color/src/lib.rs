// ABOUTME: OKLCH color engine, color-mix resolution and legacy sRGB fallback synthesis
// ABOUTME: Sits above swatch-tokens, whose scanner locates palette rule blocks

pub mod color_mix;
pub mod convert;
pub mod error;
pub mod fallback;
pub mod oklch;


pub use color_mix::{ColorMix, ColorRef, MixOperand, is_color_mix, resolve_color_mix};
pub use convert::{Rgb8, approximate_from_rgb, is_in_srgb_gamut, map_to_gamut, oklch_to_srgb};
pub use error::{ColorError, Result};
pub use fallback::{
    FallbackProperty, FallbackSheet, PaletteFallback, PaletteSource, SkippedProperty,
    palette_selector, synthesize, synthesize_palette,
};
pub use oklch::{
    MAX_CHROMA, Oklch, adjust_chroma, adjust_lightness, mix_colors, normalize_hue, rotate_hue,
    set_alpha,
};
