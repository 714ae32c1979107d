// ABOUTME: Restricted `color-mix(in oklch, A, B [P%])` grammar and its resolution
// ABOUTME: Operands are OKLCH literals, white/black, var() references or nested mixes

use std::collections::HashMap;

use crate::error::{ColorError, Result};
use crate::oklch::Oklch;

const COLOR_MIX_PREFIX: &str = "color-mix(";
const VAR_PREFIX: &str = "var(";

/// Default share of the second operand when neither carries a percentage
pub const DEFAULT_PERCENTAGE: f64 = 50.0;

/// A color operand before resolution
#[derive(Debug, Clone, PartialEq)]
pub enum ColorRef {
    Literal(Oklch),
    White,
    Black,
    Transparent,
    /// `var(--name[, fallback])`, where `name` excludes the leading `--`
    Var {
        name: String,
        fallback: Option<Box<ColorRef>>,
    },
    Mix(Box<ColorMix>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MixOperand {
    pub color: ColorRef,
    /// Percentage in `[0, 100]` written next to the operand, if any
    pub percentage: Option<f64>,
}

/// Parsed `color-mix()` expression
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMix {
    pub first: MixOperand,
    pub second: MixOperand,
}

impl ColorRef {
    /// Parse a single color value as written in a custom property.
    pub fn parse(input: &str) -> Result<Self> {
        let text = input.trim();

        if text.eq_ignore_ascii_case("white") {
            return Ok(ColorRef::White);
        }
        if text.eq_ignore_ascii_case("black") {
            return Ok(ColorRef::Black);
        }
        if text.eq_ignore_ascii_case("transparent") {
            return Ok(ColorRef::Transparent);
        }
        if has_prefix(text, COLOR_MIX_PREFIX) {
            return Ok(ColorRef::Mix(Box::new(ColorMix::parse(text)?)));
        }
        if has_prefix(text, VAR_PREFIX) {
            return parse_var(text);
        }

        Oklch::parse(text).map(ColorRef::Literal)
    }

    /// Resolve against colors computed for earlier declarations.
    pub fn resolve(&self, resolved: &HashMap<String, Oklch>) -> Result<Oklch> {
        match self {
            ColorRef::Literal(color) => Ok(*color),
            ColorRef::White => Ok(Oklch::WHITE),
            ColorRef::Black => Ok(Oklch::BLACK),
            ColorRef::Transparent => Ok(Oklch::TRANSPARENT),
            ColorRef::Var { name, fallback } => match (resolved.get(name), fallback) {
                (Some(color), _) => Ok(*color),
                (None, Some(fallback)) => fallback.resolve(resolved),
                (None, None) => Err(ColorError::unresolved(name.as_str())),
            },
            ColorRef::Mix(mix) => mix.resolve(resolved),
        }
    }
}

impl ColorMix {
    pub fn parse(input: &str) -> Result<Self> {
        let text = input.trim();
        let inner = function_arguments(text, COLOR_MIX_PREFIX)
            .ok_or_else(|| ColorError::invalid_mix(input, "expected `color-mix(...)`"))?;

        let parts = split_top_level(inner);
        let [method, first, second] = parts.as_slice() else {
            return Err(ColorError::invalid_mix(
                input,
                format!("expected 3 comma-separated arguments, found {}", parts.len()),
            ));
        };

        check_interpolation_method(method, input)?;

        Ok(ColorMix {
            first: parse_operand(first, input)?,
            second: parse_operand(second, input)?,
        })
    }

    /// Share of the second operand in `[0, 1]`.
    ///
    /// With no percentages the split is even; a single percentage fixes its
    /// own operand's share and the other takes the remainder; two
    /// percentages are normalized to sum to 100.
    pub fn second_share(&self) -> Result<f64> {
        let share = match (self.first.percentage, self.second.percentage) {
            (None, None) => DEFAULT_PERCENTAGE,
            (Some(p1), None) => 100.0 - p1,
            (None, Some(p2)) => p2,
            (Some(p1), Some(p2)) => {
                let total = p1 + p2;
                if total <= 0.0 {
                    return Err(ColorError::invalid_mix(
                        self.to_string(),
                        "percentages must not both be zero",
                    ));
                }
                p2 / total * 100.0
            }
        };
        Ok(share / 100.0)
    }

    pub fn resolve(&self, resolved: &HashMap<String, Oklch>) -> Result<Oklch> {
        let first = self.first.color.resolve(resolved)?;
        let second = self.second.color.resolve(resolved)?;
        Ok(first.mix(&second, self.second_share()?))
    }
}

impl std::fmt::Display for ColorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorRef::Literal(color) => write!(f, "{color}"),
            ColorRef::White => f.write_str("white"),
            ColorRef::Black => f.write_str("black"),
            ColorRef::Transparent => f.write_str("transparent"),
            ColorRef::Var {
                name,
                fallback: None,
            } => write!(f, "var(--{name})"),
            ColorRef::Var {
                name,
                fallback: Some(fallback),
            } => write!(f, "var(--{name}, {fallback})"),
            ColorRef::Mix(mix) => write!(f, "{mix}"),
        }
    }
}

impl std::fmt::Display for MixOperand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.percentage {
            Some(p) => write!(f, "{} {}%", self.color, crate::oklch::trim_decimal(p, 3)),
            None => write!(f, "{}", self.color),
        }
    }
}

impl std::fmt::Display for ColorMix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "color-mix(in oklch, {}, {})", self.first, self.second)
    }
}

/// Whether a declaration value is a `color-mix()` call
pub fn is_color_mix(value: &str) -> bool {
    has_prefix(value.trim(), COLOR_MIX_PREFIX)
}

/// Parse and resolve a `color-mix()` expression in one step.
///
/// `resolved` holds the colors of tokens declared earlier in the same
/// block; a `var()` naming anything else is an unresolved reference.
pub fn resolve_color_mix(expression: &str, resolved: &HashMap<String, Oklch>) -> Result<Oklch> {
    ColorMix::parse(expression)?.resolve(resolved)
}

fn has_prefix(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Content between `name(` and its matching `)`, which must end the text
fn function_arguments<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    if !has_prefix(text, prefix) {
        return None;
    }
    let open = prefix.len() - 1;
    let close = matching_paren(text, open)?;
    (close == text.len() - 1).then(|| &text[open + 1..close])
}

fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, ch) in text[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas that are not nested inside parentheses
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (offset, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(text[start..offset].trim());
                start = offset + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}

fn check_interpolation_method(method: &str, input: &str) -> Result<()> {
    let lowered = method.to_ascii_lowercase();
    let mut words = lowered.split_whitespace();

    if words.next() != Some("in") {
        return Err(ColorError::invalid_mix(
            input,
            "first argument must be `in <color-space>`",
        ));
    }
    let Some(space) = words.next() else {
        return Err(ColorError::invalid_mix(input, "missing interpolation color space"));
    };
    if space != "oklch" {
        return Err(ColorError::UnsupportedColorSpace {
            space: space.to_string(),
        });
    }

    let rest: Vec<&str> = words.collect();
    match rest.as_slice() {
        [] | ["shorter", "hue"] => Ok(()),
        _ => Err(ColorError::invalid_mix(
            input,
            format!("unsupported hue interpolation `{}`", rest.join(" ")),
        )),
    }
}

fn parse_operand(text: &str, input: &str) -> Result<MixOperand> {
    if text.is_empty() {
        return Err(ColorError::invalid_mix(input, "empty color operand"));
    }

    let (color_text, percentage) = if let Some((head, rest)) = text.split_once(char::is_whitespace)
        && let Some(p) = parse_percentage(head)
    {
        (rest.trim(), Some(p))
    } else if let Some((rest, tail)) = text.rsplit_once(char::is_whitespace)
        && let Some(p) = parse_percentage(tail)
    {
        (rest.trim(), Some(p))
    } else {
        (text, None)
    };

    if let Some(p) = percentage
        && !(0.0..=100.0).contains(&p)
    {
        return Err(ColorError::invalid_mix(
            input,
            format!("percentage {p}% is outside 0%..100%"),
        ));
    }

    Ok(MixOperand {
        color: ColorRef::parse(color_text)?,
        percentage,
    })
}

fn parse_percentage(token: &str) -> Option<f64> {
    token.strip_suffix('%')?.parse::<f64>().ok()
}

fn parse_var(text: &str) -> Result<ColorRef> {
    let inner = function_arguments(text, VAR_PREFIX).ok_or_else(|| ColorError::invalid_format(text))?;

    let (name, fallback) = match inner.split_once(',') {
        Some((name, fallback)) => (name.trim(), Some(fallback.trim())),
        None => (inner.trim(), None),
    };

    let Some(name) = name.strip_prefix("--").filter(|n| !n.is_empty()) else {
        return Err(ColorError::invalid_format(text));
    };

    let fallback = match fallback {
        Some(fallback) => Some(Box::new(ColorRef::parse(fallback)?)),
        None => None,
    };

    Ok(ColorRef::Var {
        name: name.to_string(),
        fallback,
    })
}
