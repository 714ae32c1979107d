// ABOUTME: Error types for OKLCH parsing, color-mix resolution and fallback synthesis
// ABOUTME: Unresolved references are per-token failures the synthesizer skips over

use swatch_tokens::TokenError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ColorError>;

#[derive(Debug, Error)]
pub enum ColorError {
    #[error("Invalid OKLCH color: `{input}`")]
    InvalidColorFormat { input: String },

    #[error("Invalid color-mix expression `{input}`: {reason}")]
    InvalidColorMix { input: String, reason: String },

    #[error("Unsupported color-mix interpolation space `{space}` (only oklch is supported)")]
    UnsupportedColorSpace { space: String },

    #[error("Unresolved color reference `--{name}`")]
    UnresolvedReference { name: String },

    #[error(transparent)]
    Tokens(#[from] TokenError),
}

impl ColorError {
    pub fn invalid_format<S: Into<String>>(input: S) -> Self {
        Self::InvalidColorFormat {
            input: input.into(),
        }
    }

    pub fn invalid_mix<I: Into<String>, R: Into<String>>(input: I, reason: R) -> Self {
        Self::InvalidColorMix {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn unresolved<S: Into<String>>(name: S) -> Self {
        Self::UnresolvedReference { name: name.into() }
    }
}
