// ABOUTME: OKLCH color values with parsing, formatting and perceptual arithmetic
// ABOUTME: Hue is kept in [0, 360); lightness, chroma and alpha are clamped

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::error::{ColorError, Result};

/// Practical sRGB-gamut chroma ceiling for palette ramps
pub const MAX_CHROMA: f64 = 0.4;

/// Chroma below which a color is treated as achromatic and its hue powerless
pub const ACHROMATIC_CHROMA: f64 = 1e-4;

static OKLCH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*oklch\(\s*([+-]?[\d.]+)(%?)\s+([+-]?[\d.]+)(%?)\s+([+-]?[\d.]+)(?:deg)?\s*(?:/\s*([+-]?[\d.]+)(%?)\s*)?\)\s*$",
    )
    .expect("oklch pattern is valid")
});

/// A color in the OKLCH space.
///
/// `l` and `a` are in `[0, 1]`, `c` is non-negative and `h` is degrees in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
    pub a: f64,
}

impl Oklch {
    pub const WHITE: Oklch = Oklch {
        l: 1.0,
        c: 0.0,
        h: 0.0,
        a: 1.0,
    };

    pub const BLACK: Oklch = Oklch {
        l: 0.0,
        c: 0.0,
        h: 0.0,
        a: 1.0,
    };

    pub const TRANSPARENT: Oklch = Oklch {
        l: 0.0,
        c: 0.0,
        h: 0.0,
        a: 0.0,
    };

    /// Opaque color with out-of-range components clamped or wrapped
    pub fn new(l: f64, c: f64, h: f64) -> Self {
        Self::with_alpha(l, c, h, 1.0)
    }

    pub fn with_alpha(l: f64, c: f64, h: f64, a: f64) -> Self {
        Self {
            l: clamp_unit(l),
            c: c.max(0.0) + 0.0,
            h: normalize_hue(h),
            a: clamp_unit(a),
        }
    }

    /// Parse `oklch(L C H)` or `oklch(L C H / A)`.
    ///
    /// `L` and `A` accept a bare number or a percentage; `C` accepts a
    /// percentage of [`MAX_CHROMA`]; `H` accepts an optional `deg` suffix.
    pub fn parse(input: &str) -> Result<Self> {
        let caps = OKLCH_PATTERN
            .captures(input)
            .ok_or_else(|| ColorError::invalid_format(input))?;

        let number = |index: usize| -> Result<f64> {
            caps[index]
                .parse::<f64>()
                .map_err(|_| ColorError::invalid_format(input))
        };
        let is_percent = |index: usize| caps.get(index).is_some_and(|m| m.as_str() == "%");

        let mut l = number(1)?;
        if is_percent(2) {
            l /= 100.0;
        }

        let mut c = number(3)?;
        if is_percent(4) {
            c = c / 100.0 * MAX_CHROMA;
        }

        let h = number(5)?;

        let a = match caps.get(6) {
            Some(_) => {
                let a = number(6)?;
                if is_percent(7) { a / 100.0 } else { a }
            }
            None => 1.0,
        };

        Ok(Self::with_alpha(l, c, h, a))
    }

    /// Render as `oklch(...)`; lightness as a percentage unless `use_percentage` is false.
    pub fn format(&self, use_percentage: bool) -> String {
        let lightness = if use_percentage {
            format!("{:.1}%", self.l * 100.0)
        } else {
            format!("{:.3}", self.l)
        };

        let mut hue = format!("{:.1}", self.h);
        // Rounding can carry 359.95.. up to a full turn
        if hue == "360.0" {
            hue = "0.0".to_string();
        }

        let mut out = format!("oklch({} {:.3} {}", lightness, self.c, hue);
        if self.a < 1.0 {
            out.push_str(" / ");
            out.push_str(&trim_decimal(self.a, 3));
        }
        out.push(')');
        out
    }

    pub fn is_achromatic(&self) -> bool {
        self.c < ACHROMATIC_CHROMA
    }

    /// Shift lightness by `delta`, clamped to `[0, 1]`
    pub fn adjust_lightness(&self, delta: f64) -> Self {
        Self {
            l: clamp_unit(self.l + delta),
            ..*self
        }
    }

    /// Shift chroma by `delta`, clamped to `[0, MAX_CHROMA]`
    pub fn adjust_chroma(&self, delta: f64) -> Self {
        Self {
            c: (self.c + delta).clamp(0.0, MAX_CHROMA) + 0.0,
            ..*self
        }
    }

    /// Rotate hue by `degrees`, wrapping around the wheel
    pub fn rotate_hue(&self, degrees: f64) -> Self {
        Self {
            h: normalize_hue(self.h + degrees),
            ..*self
        }
    }

    pub fn set_alpha(&self, alpha: f64) -> Self {
        Self {
            a: clamp_unit(alpha),
            ..*self
        }
    }

    /// Interpolate towards `other`; `ratio` is the share of `other`.
    ///
    /// Lightness, chroma and alpha interpolate linearly. Hue takes the
    /// shortest path around the wheel, so 10° and 350° meet at 0°. An
    /// achromatic operand has no meaningful hue and adopts the other's.
    pub fn mix(&self, other: &Oklch, ratio: f64) -> Oklch {
        let t = if ratio.is_nan() { 0.5 } else { ratio.clamp(0.0, 1.0) };
        if t == 0.0 {
            return *self;
        }
        if t == 1.0 {
            return *other;
        }

        let (mut h1, mut h2) = (self.h, other.h);
        match (self.is_achromatic(), other.is_achromatic()) {
            (true, false) => h1 = h2,
            (false, true) => h2 = h1,
            _ => {}
        }

        if (h2 - h1).abs() > 180.0 {
            if h1 < h2 {
                h1 += 360.0;
            } else {
                h2 += 360.0;
            }
        }

        Oklch {
            l: lerp(self.l, other.l, t),
            c: lerp(self.c, other.c, t),
            h: normalize_hue(lerp(h1, h2, t)),
            a: lerp(self.a, other.a, t),
        }
    }
}

impl fmt::Display for Oklch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(true))
    }
}

impl FromStr for Oklch {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        Oklch::parse(s)
    }
}

/// Wrap any angle into `[0, 360)`
pub fn normalize_hue(h: f64) -> f64 {
    let wrapped = h % 360.0;
    let wrapped = if wrapped < 0.0 { wrapped + 360.0 } else { wrapped };
    // Adding 360 to a tiny negative remainder can round up to exactly 360
    if wrapped >= 360.0 { 0.0 } else { wrapped + 0.0 }
}

fn clamp_unit(v: f64) -> f64 {
    v.clamp(0.0, 1.0) + 0.0
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if a == b { a } else { a + (b - a) * t }
}

pub(crate) fn trim_decimal(value: f64, places: usize) -> String {
    let text = format!("{value:.places$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Parse, lighten or darken, and re-format an OKLCH string
pub fn adjust_lightness(color: &str, delta: f64) -> Result<String> {
    Ok(Oklch::parse(color)?.adjust_lightness(delta).to_string())
}

/// Parse, shift chroma, and re-format an OKLCH string
pub fn adjust_chroma(color: &str, delta: f64) -> Result<String> {
    Ok(Oklch::parse(color)?.adjust_chroma(delta).to_string())
}

/// Parse, rotate hue, and re-format an OKLCH string
pub fn rotate_hue(color: &str, degrees: f64) -> Result<String> {
    Ok(Oklch::parse(color)?.rotate_hue(degrees).to_string())
}

/// Parse, replace alpha, and re-format an OKLCH string
pub fn set_alpha(color: &str, alpha: f64) -> Result<String> {
    Ok(Oklch::parse(color)?.set_alpha(alpha).to_string())
}

/// Mix two OKLCH strings; `ratio` is the share of the second color
pub fn mix_colors(first: &str, second: &str, ratio: f64) -> Result<Oklch> {
    Ok(Oklch::parse(first)?.mix(&Oklch::parse(second)?, ratio))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percentage_and_decimal_lightness() {
        let a = Oklch::parse("oklch(60% 0.15 250)").unwrap();
        let b = Oklch::parse("oklch(0.6 0.15 250)").unwrap();
        assert!((a.l - 0.6).abs() < 1e-12);
        assert_eq!(a, b);
        assert_eq!(a.a, 1.0);
    }

    #[test]
    fn test_parse_alpha_and_units() {
        let color = Oklch::parse("OKLCH(50% 0.1 120deg / 50%)").unwrap();
        assert_eq!(color.h, 120.0);
        assert_eq!(color.a, 0.5);

        let color = Oklch::parse("oklch(0% 0 0 / 0.25)").unwrap();
        assert_eq!(color.a, 0.25);

        let color = Oklch::parse("oklch(50% 50% 10)").unwrap();
        assert!((color.c - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_parse_clamps_and_wraps() {
        let color = Oklch::parse("oklch(120% 0.1 -30)").unwrap();
        assert_eq!(color.l, 1.0);
        assert_eq!(color.h, 330.0);

        let color = Oklch::parse("oklch(50% -0.1 720 / 2)").unwrap();
        assert_eq!(color.c, 0.0);
        assert_eq!(color.h, 0.0);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for input in [
            "oklch(50% 0.1)",
            "oklch(50% 0.1 20",
            "rgb(1, 2, 3)",
            "oklch(5.0.1% 0.1 20)",
            "",
            "oklch(a b c)",
        ] {
            assert!(
                matches!(Oklch::parse(input), Err(ColorError::InvalidColorFormat { .. })),
                "expected failure for {input:?}"
            );
        }
    }

    #[test]
    fn test_format() {
        let color = Oklch::new(0.6, 0.15, 250.0);
        assert_eq!(color.format(true), "oklch(60.0% 0.150 250.0)");
        assert_eq!(color.format(false), "oklch(0.600 0.150 250.0)");
        assert_eq!(color.set_alpha(0.5).to_string(), "oklch(60.0% 0.150 250.0 / 0.5)");
    }

    #[test]
    fn test_format_keeps_hue_below_full_turn() {
        let color = Oklch::new(0.5, 0.1, 359.97);
        assert_eq!(color.format(true), "oklch(50.0% 0.100 0.0)");
        assert_eq!(Oklch::new(0.5, 0.1, 359.9).format(true), "oklch(50.0% 0.100 359.9)");
    }

    #[test]
    fn test_adjust_lightness_clamps() {
        assert_eq!(
            adjust_lightness("oklch(90% 0.1 200)", 0.5).unwrap(),
            "oklch(100.0% 0.100 200.0)"
        );
        assert_eq!(
            adjust_lightness("oklch(10% 0.1 200)", -0.5).unwrap(),
            "oklch(0.0% 0.100 200.0)"
        );
    }

    #[test]
    fn test_adjust_chroma_clamps_to_ceiling() {
        assert_eq!(
            adjust_chroma("oklch(50% 0.35 30)", 0.2).unwrap(),
            "oklch(50.0% 0.400 30.0)"
        );
        assert_eq!(
            adjust_chroma("oklch(50% 0.05 30)", -0.2).unwrap(),
            "oklch(50.0% 0.000 30.0)"
        );
    }

    #[test]
    fn test_rotate_hue_wraps() {
        assert_eq!(rotate_hue("oklch(50% 0.1 350)", 20.0).unwrap(), "oklch(50.0% 0.100 10.0)");
        assert_eq!(rotate_hue("oklch(50% 0.1 10)", -20.0).unwrap(), "oklch(50.0% 0.100 350.0)");
        assert_eq!(rotate_hue("oklch(50% 0.1 42)", 360.0).unwrap(), "oklch(50.0% 0.100 42.0)");
    }

    #[test]
    fn test_set_alpha_clamps() {
        assert_eq!(set_alpha("oklch(50% 0.1 42)", 1.5).unwrap(), "oklch(50.0% 0.100 42.0)");
        assert_eq!(
            set_alpha("oklch(50% 0.1 42)", -1.0).unwrap(),
            "oklch(50.0% 0.100 42.0 / 0)"
        );
    }

    #[test]
    fn test_normalize_hue() {
        assert_eq!(normalize_hue(0.0), 0.0);
        assert_eq!(normalize_hue(360.0), 0.0);
        assert_eq!(normalize_hue(-90.0), 270.0);
        assert_eq!(normalize_hue(725.0), 5.0);
        assert!(normalize_hue(-1e-15) < 360.0);
        assert!(normalize_hue(-0.0).is_sign_positive());
    }

    #[test]
    fn test_trim_decimal() {
        assert_eq!(trim_decimal(0.5, 3), "0.5");
        assert_eq!(trim_decimal(0.125, 3), "0.125");
        assert_eq!(trim_decimal(1.0, 3), "1");
    }
}
