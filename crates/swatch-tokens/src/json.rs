// ABOUTME: Extraction of design tokens from JSON trees using `$value`/`$description` nodes
// ABOUTME: Paths are dot-joined non-`$` keys; `$`-prefixed keys are metadata

use serde_json::{Map, Value};
use swatch_types::{TokenRecord, TokenTree};

use crate::error::{Result, TokenError};

const VALUE_KEY: &str = "$value";
const DESCRIPTION_KEY: &str = "$description";

/// Parse JSON text and extract its tokens.
pub fn parse_json_tokens(text: &str, origin: &str) -> Result<TokenTree> {
    let root: Value = serde_json::from_str(text).map_err(|source| TokenError::JsonParse {
        origin: origin.to_string(),
        source,
    })?;

    if !root.is_object() {
        return Err(TokenError::NotATokenTree {
            origin: origin.to_string(),
        });
    }

    Ok(extract_json_tokens(&strip_root_metadata(root), origin))
}

/// Drop `$schema` and other `$`-prefixed keys from the root object.
pub fn strip_root_metadata(root: Value) -> Value {
    match root {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| !key.starts_with('$'))
                .collect(),
        ),
        other => other,
    }
}

/// Walk a parsed JSON tree and collect every node that carries `$value`.
///
/// Token nodes are leaves: children of a token node are not visited.
pub fn extract_json_tokens(root: &Value, origin: &str) -> TokenTree {
    let mut tree = TokenTree::new(origin);
    if let Value::Object(map) = root {
        let mut path = Vec::new();
        walk(map, &mut path, &mut tree);
    }
    swatch_logging::debug!(origin = %origin, tokens = tree.len(), "Extracted JSON tokens");
    tree
}

fn walk<'a>(map: &'a Map<String, Value>, path: &mut Vec<&'a str>, tree: &mut TokenTree) {
    for (key, value) in map {
        if key.starts_with('$') {
            continue;
        }
        let Value::Object(child) = value else {
            continue;
        };

        path.push(key);
        match child.get(VALUE_KEY) {
            Some(token_value) => {
                let record = TokenRecord::new(render_value(token_value), description_of(child));
                tree.insert(path.join("."), record);
            }
            None => walk(child, path, tree),
        }
        path.pop();
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn description_of(node: &Map<String, Value>) -> String {
    node.get(DESCRIPTION_KEY)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
