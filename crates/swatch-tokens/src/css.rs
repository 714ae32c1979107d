// ABOUTME: Line-oriented extraction of CSS custom properties and their comment descriptions
// ABOUTME: Handles multi-line values, inline comments and preceding comment blocks

use once_cell::sync::Lazy;
use regex::Regex;
use swatch_types::{TokenRecord, TokenTree};

use crate::error::{Result, TokenError};
use crate::scan::check_balanced;

static DECLARATION_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[{;])\s*--([A-Za-z0-9_-]+)\s*:").expect("declaration pattern is valid")
});

static INLINE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\*+(.*?)\*+/").expect("inline comment pattern is valid"));

static SINGLE_LINE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/\*+(.*?)\*+/$").expect("single-line comment pattern is valid"));

/// Leading comment lines that title a section rather than describe a token
const BANNER_PREFIXES: [&str; 3] = ["Palette:", "Theme:", "==="];

/// A custom-property declaration found by the line scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name without the leading `--`
    pub name: String,
    /// Value with surrounding whitespace trimmed and line breaks collapsed
    pub value: String,
    /// 1-based line the declaration starts on
    pub line: usize,
    /// 1-based line holding the terminating `;`
    pub end_line: usize,
    /// Text following the terminator on the end line, up to the next declaration
    trailing: String,
    /// Whether nothing but whitespace precedes the declaration on its line
    first_on_line: bool,
}

/// Scan custom-property declarations in source order.
///
/// Values may span several lines up to the terminating `;` (or the closing
/// `}` of the rule). Lines that begin inside a comment are skipped.
pub fn scan_declarations(css: &str, origin: &str) -> Result<Vec<Declaration>> {
    let lines: Vec<&str> = css.lines().collect();
    let comment_starts = lines_starting_in_comment(&lines);
    let mut declarations = Vec::new();
    let mut i = 0;
    let mut col = 0;

    while i < lines.len() {
        if col == 0 && comment_starts[i] {
            i += 1;
            continue;
        }
        let line = lines[i];
        let Some(caps) = DECLARATION_START.captures(&line[col..]) else {
            i += 1;
            col = 0;
            continue;
        };

        let name = caps[1].to_string();
        let (match_start, match_end) = caps.get(0).map_or((0, 0), |m| (m.start(), m.end()));
        let first_on_line = line[..col + match_start].trim().is_empty()
            && !caps[0].trim_start().starts_with(['{', ';']);

        let mut end = i;
        let mut offset = col + match_end;
        let mut current = &line[offset..];
        let mut value = String::new();

        let resume = loop {
            if let Some(pos) = find_terminator(current) {
                value.push_str(&current[..pos]);
                break offset + pos + 1;
            }

            value.push_str(current);
            value.push(' ');
            end += 1;
            if end >= lines.len() {
                return Err(TokenError::css_parse(
                    origin,
                    i + 1,
                    format!("declaration `--{name}` is missing its terminating `;`"),
                ));
            }
            current = lines[end];
            offset = 0;
        };

        let rest = &lines[end][resume.min(lines[end].len())..];
        let trailing = DECLARATION_START
            .find(rest)
            .map_or(rest, |next| &rest[..next.start()]);

        declarations.push(Declaration {
            name,
            value: collapse_whitespace(&value),
            line: i + 1,
            end_line: end + 1,
            trailing: trailing.to_string(),
            first_on_line,
        });
        i = end;
        col = resume.min(lines[end].len());
    }

    Ok(declarations)
}

/// Extract every custom property of a stylesheet with its description.
pub fn extract_css_tokens(css: &str, origin: &str) -> Result<TokenTree> {
    check_balanced(css, origin)?;

    let lines: Vec<&str> = css.lines().collect();
    let mut tree = TokenTree::new(origin);

    for declaration in scan_declarations(css, origin)? {
        let description = describe(&declaration, &lines);
        if tree
            .insert(
                declaration.name.clone(),
                TokenRecord::new(declaration.value, description),
            )
            .is_some()
        {
            swatch_logging::trace!(
                origin = %origin,
                token = %declaration.name,
                line = declaration.line,
                "Token redeclared; keeping first position"
            );
        }
    }

    swatch_logging::debug!(origin = %origin, tokens = tree.len(), "Extracted CSS tokens");
    Ok(tree)
}

/// Description lookup in priority order: inline comment after the `;`,
/// a single-line comment on the previous line, then a multi-line block
/// ending on the previous line. Falls back to an empty description.
fn describe(declaration: &Declaration, lines: &[&str]) -> String {
    if let Some(caps) = INLINE_COMMENT.captures(&declaration.trailing) {
        let text = caps[1].trim();
        if !text.is_empty() {
            return text.to_string();
        }
    }

    if !declaration.first_on_line {
        return String::new();
    }

    // `line` is 1-based, so this is the index of the line above
    let Some(above) = declaration.line.checked_sub(2) else {
        return String::new();
    };
    let previous = lines[above].trim();

    if let Some(caps) = SINGLE_LINE_COMMENT.captures(previous) {
        return join_comment_lines(&[caps[1].trim()]);
    }

    if previous.ends_with("*/") {
        return multi_line_comment(lines, above);
    }

    String::new()
}

/// Walk upward from the line closing a comment to the line opening it.
fn multi_line_comment(lines: &[&str], closing: usize) -> String {
    let mut opening = closing;
    loop {
        let trimmed = lines[opening].trim_start();
        if trimmed.starts_with("/*") {
            break;
        }
        if trimmed.contains("/*") || opening == 0 {
            // Comment opened after other content, or never opened
            return String::new();
        }
        opening -= 1;
    }

    let cleaned: Vec<&str> = lines[opening..=closing]
        .iter()
        .map(|line| clean_comment_line(line))
        .filter(|line| !line.is_empty())
        .collect();

    join_comment_lines(&cleaned)
}

fn clean_comment_line(line: &str) -> &str {
    let text = line.trim();
    let text = text.strip_suffix("*/").unwrap_or(text);
    text.trim_start_matches("/*")
        .trim_start_matches('*')
        .trim_end_matches('*')
        .trim()
}

fn join_comment_lines(lines: &[&str]) -> String {
    let body = match lines.split_first() {
        Some((first, rest)) if BANNER_PREFIXES.iter().any(|p| first.starts_with(p)) => rest,
        _ => lines,
    };
    body.join(" ")
}

/// Position of the `;` or rule-closing `}` that ends a value, ignoring
/// anything nested in parentheses or quotes.
fn find_terminator(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (pos, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';' | '}') if depth == 0 => return Some(pos),
            _ => {}
        }
    }
    None
}

fn lines_starting_in_comment(lines: &[&str]) -> Vec<bool> {
    let mut in_comment = false;
    let mut starts = Vec::with_capacity(lines.len());

    for line in lines {
        starts.push(in_comment);
        let mut rest = *line;
        loop {
            let marker = if in_comment { "*/" } else { "/*" };
            match rest.find(marker) {
                Some(pos) => {
                    in_comment = !in_comment;
                    rest = &rest[pos + 2..];
                }
                None => break,
            }
        }
    }

    starts
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description_of(tree: &TokenTree, name: &str) -> String {
        tree.get(name)
            .map(|record| record.description.clone())
            .unwrap_or_else(|| panic!("token {name} not extracted"))
    }

    #[test]
    fn test_inline_comment_wins() {
        let css = "/* Above */\n:root { --radius-sm: 4px; /* Small radius */ }";
        let css = css.replace(":root { ", ":root {\n");
        let tree = extract_css_tokens(&css, "theme.css").unwrap();
        assert_eq!(tree.get("radius-sm").unwrap().value, "4px");
        assert_eq!(description_of(&tree, "radius-sm"), "Small radius");
    }

    #[test]
    fn test_single_line_comment_above() {
        let css = ":root {\n  /* Primary brand color */\n  --palette-primary-500: oklch(60% 0.15 250);\n}";
        let tree = extract_css_tokens(css, "arctic.css").unwrap();
        assert_eq!(
            description_of(&tree, "palette-primary-500"),
            "Primary brand color"
        );
        assert_eq!(
            tree.get("palette-primary-500").unwrap().value,
            "oklch(60% 0.15 250)"
        );
    }

    #[test]
    fn test_multi_line_block_strips_banner() {
        let css = r#":root.arctic {
  /**
   * Palette: Arctic
   * Cool blue ramp used for
   * interactive elements
   */
  --palette-primary-500: oklch(60% 0.15 250);
}"#;
        let tree = extract_css_tokens(css, "arctic.css").unwrap();
        assert_eq!(
            description_of(&tree, "palette-primary-500"),
            "Cool blue ramp used for interactive elements"
        );
    }

    #[test]
    fn test_banner_only_comment_gives_empty_description() {
        let css = ":root {\n  /* ===== Spacing ===== */\n  --space-1: 4px;\n}";
        let tree = extract_css_tokens(css, "theme.css").unwrap();
        assert_eq!(description_of(&tree, "space-1"), "");
    }

    #[test]
    fn test_no_comment_gives_empty_description() {
        let css = ":root {\n  --space-1: 4px;\n  --space-2: 8px;\n}";
        let tree = extract_css_tokens(css, "theme.css").unwrap();
        assert_eq!(description_of(&tree, "space-1"), "");
        assert_eq!(description_of(&tree, "space-2"), "");
    }

    #[test]
    fn test_previous_declaration_comment_is_not_inherited() {
        let css = ":root {\n  --a: 1px; /* first */\n  --b: 2px;\n}";
        let tree = extract_css_tokens(css, "theme.css").unwrap();
        assert_eq!(description_of(&tree, "a"), "first");
        assert_eq!(description_of(&tree, "b"), "");
    }

    #[test]
    fn test_multi_line_value() {
        let css = r#":root {
  --shadow-lg:
    0 10px 15px -3px oklch(0% 0 0 / 0.1),
    0 4px 6px -4px oklch(0% 0 0 / 0.1); /* Large shadow */
  --next: 1px;
}"#;
        let declarations = scan_declarations(css, "theme.css").unwrap();
        assert_eq!(declarations.len(), 2);
        assert_eq!(
            declarations[0].value,
            "0 10px 15px -3px oklch(0% 0 0 / 0.1), 0 4px 6px -4px oklch(0% 0 0 / 0.1)"
        );
        assert_eq!(declarations[0].line, 2);
        assert_eq!(declarations[0].end_line, 4);

        let tree = extract_css_tokens(css, "theme.css").unwrap();
        assert_eq!(description_of(&tree, "shadow-lg"), "Large shadow");
    }

    #[test]
    fn test_semicolon_inside_parentheses_does_not_terminate() {
        let css = ":root {\n  --icon: url(\"data:image/svg+xml;utf8,<svg/>\");\n}";
        let declarations = scan_declarations(css, "theme.css").unwrap();
        assert_eq!(declarations[0].value, "url(\"data:image/svg+xml;utf8,<svg/>\")");
    }

    #[test]
    fn test_last_declaration_without_semicolon() {
        let css = ":root { \n  --a: 1px }";
        let declarations = scan_declarations(css, "theme.css").unwrap();
        assert_eq!(declarations[0].value, "1px");
    }

    #[test]
    fn test_commented_out_declarations_are_skipped() {
        let css = ":root {\n  /*\n  --old: 1px;\n  */\n  --new: 2px;\n}";
        let tree = extract_css_tokens(css, "theme.css").unwrap();
        assert!(!tree.contains("old"));
        assert!(tree.contains("new"));
    }

    #[test]
    fn test_unterminated_comment_degrades() {
        let css = ":root {\n  --a: 1px;\n}\n/* trailing note without end";
        let tree = extract_css_tokens(css, "theme.css").unwrap();
        assert_eq!(description_of(&tree, "a"), "");
    }

    #[test]
    fn test_unterminated_declaration_is_parse_error() {
        let css = "--a: 1px";
        let err = extract_css_tokens(css, "broken.css").unwrap_err();
        assert!(matches!(err, TokenError::CssParse { line: 1, .. }));
    }

    #[test]
    fn test_unbalanced_braces_is_parse_error() {
        let css = ":root {\n  --a: 1px;\n";
        assert!(matches!(
            extract_css_tokens(css, "broken.css"),
            Err(TokenError::CssParse { .. })
        ));
    }

    #[test]
    fn test_declaration_order_is_preserved() {
        let css = ":root {\n  --c: 3;\n  --a: 1;\n  --b: 2;\n}";
        let tree = extract_css_tokens(css, "order.css").unwrap();
        let names: Vec<_> = tree.names().collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
