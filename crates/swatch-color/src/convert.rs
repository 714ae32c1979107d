// ABOUTME: OKLCH to sRGB conversion for legacy fallbacks, with chroma-reduction gamut mapping
// ABOUTME: Also carries the coarse RGB to OKLCH approximation used for diagnostics

use std::fmt;

use palette::convert::FromColorUnclamped;
use palette::{OklabHue, Srgb};

use crate::oklch::{MAX_CHROMA, Oklch, normalize_hue, trim_decimal};

const GAMUT_EPSILON: f64 = 1e-6;
const GAMUT_STEPS: usize = 32;

/// 8-bit sRGB color with a separate alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl Rgb8 {
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    /// `#rrggbb`, or `#rrggbbaa` when translucent
    pub fn to_hex(&self) -> String {
        let mut hex = format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b);
        if self.alpha < 1.0 {
            hex.push_str(&format!("{:02x}", channel_to_u8(self.alpha)));
        }
        hex
    }

    /// Relative luminance of the gamma-encoded channels
    pub fn luma(&self) -> f64 {
        luma(
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alpha < 1.0 {
            write!(
                f,
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                trim_decimal(self.alpha, 3)
            )
        } else {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        }
    }
}

/// Convert to 8-bit sRGB, reducing chroma until the color fits the gamut.
pub fn oklch_to_srgb(color: &Oklch) -> Rgb8 {
    let mapped = map_to_gamut(color);
    let rgb = to_srgb_unclamped(&mapped);
    Rgb8 {
        r: channel_to_u8(rgb.red),
        g: channel_to_u8(rgb.green),
        b: channel_to_u8(rgb.blue),
        alpha: color.a,
    }
}

/// Reduce chroma at constant lightness and hue until sRGB can display the color.
///
/// Lightness outside `[0, 1]` never occurs because [`Oklch`] clamps it, so
/// zero chroma always terminates inside the gamut.
pub fn map_to_gamut(color: &Oklch) -> Oklch {
    if is_in_srgb_gamut(color) {
        return *color;
    }

    // Bisect between the achromatic axis and the requested chroma
    let mut low = 0.0;
    let mut high = color.c;
    for _ in 0..GAMUT_STEPS {
        let mid = (low + high) / 2.0;
        let candidate = Oklch { c: mid, ..*color };
        if is_in_srgb_gamut(&candidate) {
            low = mid;
        } else {
            high = mid;
        }
    }

    Oklch { c: low, ..*color }
}

pub fn is_in_srgb_gamut(color: &Oklch) -> bool {
    let rgb = to_srgb_unclamped(color);
    [rgb.red, rgb.green, rgb.blue]
        .iter()
        .all(|v| (-GAMUT_EPSILON..=1.0 + GAMUT_EPSILON).contains(v))
}

fn to_srgb_unclamped(color: &Oklch) -> Srgb<f64> {
    let oklch = palette::Oklch::new(color.l, color.c, OklabHue::from_degrees(color.h));
    Srgb::from_color_unclamped(oklch)
}

fn channel_to_u8(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn luma(r: f64, g: f64, b: f64) -> f64 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// Coarse OKLCH estimate of an 8-bit RGB color.
///
/// Lightness is the Rec. 709 luma of the encoded channels and chroma is the
/// max-min channel spread scaled to [`MAX_CHROMA`]. This is not an inverse
/// of [`oklch_to_srgb`] and must not feed back into palette values.
pub fn approximate_from_rgb(r: u8, g: u8, b: u8) -> Oklch {
    let (rf, gf, bf) = (
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
    );
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let spread = max - min;

    let hue = if spread == 0.0 {
        0.0
    } else if max == rf {
        60.0 * ((gf - bf) / spread)
    } else if max == gf {
        60.0 * ((bf - rf) / spread + 2.0)
    } else {
        60.0 * ((rf - gf) / spread + 4.0)
    };

    Oklch::new(luma(rf, gf, bf), spread * MAX_CHROMA, normalize_hue(hue))
}
