// ABOUTME: Token records and ordered token trees extracted from CSS or JSON sources
// ABOUTME: Declaration order is kept for deterministic reports, never for comparison

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Token key: `palette-primary-500` in CSS form or `palette.primary.500` in JSON form
pub type TokenName = String;

/// Value and human-readable description of a single token.
///
/// `description` is the empty string when no comment or `$description` was
/// found. It is never absent, so "no description" and "different description"
/// stay distinguishable for the comparator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub value: String,
    #[serde(default)]
    pub description: String,
}

impl TokenRecord {
    pub fn new(value: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: description.into(),
        }
    }

    /// Record with no description
    pub fn bare(value: impl Into<String>) -> Self {
        Self::new(value, String::new())
    }

    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }
}

/// Ordered mapping of token names to records, tagged with the file it came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenTree {
    /// Display label of the originating file (used in mismatch reports)
    pub origin: String,
    entries: IndexMap<TokenName, TokenRecord>,
}

impl TokenTree {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            entries: IndexMap::new(),
        }
    }

    /// Insert a token. A repeated name keeps its first position and takes the
    /// latest record; the previous record is returned.
    pub fn insert(&mut self, name: impl Into<TokenName>, record: TokenRecord) -> Option<TokenRecord> {
        self.entries.insert(name.into(), record)
    }

    pub fn get(&self, name: &str) -> Option<&TokenRecord> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Token names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenRecord)> {
        self.entries.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Relabel the tree, e.g. after loading it from a path
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }
}

impl<N: Into<TokenName>> FromIterator<(N, TokenRecord)> for TokenTree {
    fn from_iter<I: IntoIterator<Item = (N, TokenRecord)>>(iter: I) -> Self {
        let mut tree = TokenTree::default();
        for (name, record) in iter {
            tree.insert(name, record);
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut tree = TokenTree::new("light.json");
        tree.insert("surface.DEFAULT", TokenRecord::bare("#fff"));
        tree.insert("accent", TokenRecord::bare("#00f"));
        tree.insert("border", TokenRecord::bare("#ccc"));

        let names: Vec<_> = tree.names().collect();
        assert_eq!(names, vec!["surface.DEFAULT", "accent", "border"]);
    }

    #[test]
    fn test_repeated_name_keeps_position_and_last_value() {
        let mut tree = TokenTree::new("arctic.css");
        tree.insert("a", TokenRecord::bare("1"));
        tree.insert("b", TokenRecord::bare("2"));
        let previous = tree.insert("a", TokenRecord::new("3", "third"));

        assert_eq!(previous, Some(TokenRecord::bare("1")));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.names().next(), Some("a"));
        assert_eq!(tree.get("a").map(|r| r.value.as_str()), Some("3"));
    }

    #[test]
    fn test_missing_description_is_empty_string() {
        let record: TokenRecord = serde_json::from_str(r#"{"value": "4px"}"#).unwrap();
        assert_eq!(record.description, "");
        assert!(!record.has_description());
    }
}
