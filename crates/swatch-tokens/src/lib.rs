// ABOUTME: Token extraction from CSS custom properties and JSON token trees
// ABOUTME: Also provides the rule-block scanner and the consistency comparator

pub mod compare;
pub mod css;
pub mod error;
pub mod json;
pub mod scan;

pub use compare::{compare, validate_pair};
pub use css::{Declaration, extract_css_tokens, scan_declarations};
pub use error::{Result, TokenError};
pub use json::{extract_json_tokens, parse_json_tokens, strip_root_metadata};
pub use scan::{RuleBlock, find_rule_block};

use swatch_types::TokenTree;

/// Source format of a token file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFormat {
    Css,
    Json,
}

impl TokenFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TokenFormat::Css => "css",
            TokenFormat::Json => "json",
        }
    }

    /// Guess the format from a file name's extension
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "css" => Some(TokenFormat::Css),
            "json" => Some(TokenFormat::Json),
            _ => None,
        }
    }
}

/// Extract a token tree from raw file text in the given format.
pub fn extract(text: &str, format: TokenFormat, origin: &str) -> Result<TokenTree> {
    match format {
        TokenFormat::Css => extract_css_tokens(text, origin),
        TokenFormat::Json => parse_json_tokens(text, origin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(TokenFormat::from_file_name("arctic.css"), Some(TokenFormat::Css));
        assert_eq!(TokenFormat::from_file_name("light.JSON"), Some(TokenFormat::Json));
        assert_eq!(TokenFormat::from_file_name("README"), None);
        assert_eq!(TokenFormat::from_file_name("notes.md"), None);
    }

    #[test]
    fn test_extract_dispatches_on_format() {
        let css = extract(":root { --a: 1px; }", TokenFormat::Css, "a.css").unwrap();
        assert!(css.contains("a"));

        let json = extract(r#"{"a": {"$value": "1px"}}"#, TokenFormat::Json, "a.json").unwrap();
        assert!(json.contains("a"));
    }
}
