// ABOUTME: Error types for token extraction from CSS and JSON sources
// ABOUTME: Every variant names the originating file so reports need no re-read

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TokenError>;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON tokens in {origin}: {source}")]
    JsonParse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed CSS in {origin} at line {line}: {reason}")]
    CssParse {
        origin: String,
        line: usize,
        reason: String,
    },

    #[error("{origin} is not a token tree: the JSON root must be an object")]
    NotATokenTree { origin: String },

    #[error("Rule block `{selector}` not found in {origin}")]
    RuleBlockNotFound { origin: String, selector: String },
}

impl TokenError {
    /// Create a CSS parse error
    pub fn css_parse<O: Into<String>, R: Into<String>>(origin: O, line: usize, reason: R) -> Self {
        Self::CssParse {
            origin: origin.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Create a rule-block-not-found error
    pub fn rule_block_not_found<O: Into<String>, S: Into<String>>(origin: O, selector: S) -> Self {
        Self::RuleBlockNotFound {
            origin: origin.into(),
            selector: selector.into(),
        }
    }
}
