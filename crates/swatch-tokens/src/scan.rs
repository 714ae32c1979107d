// ABOUTME: Narrow CSS scanner with explicit brace-depth counting
// ABOUTME: Locates balanced rule blocks even when they contain nested braces

use std::ops::Range;

use crate::error::{Result, TokenError};

/// Body of a `selector { ... }` rule, borrowed from the scanned stylesheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBlock<'a> {
    pub selector: String,
    /// Text between the outer braces, exclusive
    pub body: &'a str,
    /// 1-based line of the opening brace
    pub start_line: usize,
}

impl RuleBlock<'_> {
    /// Body with nested blocks such as `@media { ... }` blanked out.
    ///
    /// Only declarations that apply unconditionally remain. Line breaks
    /// inside the blanked regions are kept, so line numbers still match
    /// `body`.
    pub fn top_level_body(&self) -> String {
        let mut nested: Vec<Range<usize>> = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;

        for (offset, brace) in analyze(self.body).braces {
            match brace {
                Brace::Open => {
                    if depth == 0 {
                        start = offset;
                    }
                    depth += 1;
                }
                Brace::Close => {
                    let Some(remaining) = depth.checked_sub(1) else {
                        continue;
                    };
                    depth = remaining;
                    if depth == 0 {
                        nested.push(start..offset + 1);
                    }
                }
            }
        }
        if depth > 0 {
            nested.push(start..self.body.len());
        }

        self.body
            .char_indices()
            .map(|(offset, c)| {
                if c != '\n' && nested.iter().any(|range| range.contains(&offset)) {
                    ' '
                } else {
                    c
                }
            })
            .collect()
    }
}

/// Brace and comment positions of a stylesheet, ignoring anything inside
/// comments or string literals.
#[derive(Debug, Default)]
struct Structure {
    braces: Vec<(usize, Brace)>,
    comments: Vec<Range<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Brace {
    Open,
    Close,
}

fn analyze(css: &str) -> Structure {
    let bytes = css.as_bytes();
    let mut structure = Structure::default();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                // Unterminated comments run to end of input
                let end = css[i + 2..]
                    .find("*/")
                    .map(|offset| i + 2 + offset + 2)
                    .unwrap_or(bytes.len());
                structure.comments.push(i..end);
                i = end;
            }
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'{' => {
                structure.braces.push((i, Brace::Open));
                i += 1;
            }
            b'}' => {
                structure.braces.push((i, Brace::Close));
                i += 1;
            }
            _ => i += 1,
        }
    }

    structure
}

/// 1-based line number of a byte offset
pub fn line_of(css: &str, offset: usize) -> usize {
    css[..offset.min(css.len())].matches('\n').count() + 1
}

/// Verify every `{` has a matching `}`.
pub fn check_balanced(css: &str, origin: &str) -> Result<()> {
    let mut open_stack = Vec::new();
    for (offset, brace) in analyze(css).braces {
        match brace {
            Brace::Open => open_stack.push(offset),
            Brace::Close => {
                if open_stack.pop().is_none() {
                    return Err(TokenError::css_parse(
                        origin,
                        line_of(css, offset),
                        "unexpected `}` without a matching `{`",
                    ));
                }
            }
        }
    }

    match open_stack.pop() {
        Some(offset) => Err(TokenError::css_parse(
            origin,
            line_of(css, offset),
            "unclosed `{`",
        )),
        None => Ok(()),
    }
}

/// Find the first rule whose selector list contains `selector` exactly.
///
/// The block end is located by counting braces from the opening `{` until
/// the depth returns to zero, so nested `@media`/`@supports` blocks inside
/// the rule are kept intact. Returns `Ok(None)` when the selector does not
/// occur, and a parse error when its block never closes.
pub fn find_rule_block<'a>(
    css: &'a str,
    selector: &str,
    origin: &str,
) -> Result<Option<RuleBlock<'a>>> {
    let structure = analyze(css);
    let in_comment = |offset: usize| structure.comments.iter().any(|r| r.contains(&offset));

    for (start, _) in css.match_indices(selector) {
        if in_comment(start) || !is_selector_boundary_before(css, start) {
            continue;
        }

        let after = start + selector.len();
        let Some(open) = opening_brace_after(css, after) else {
            continue;
        };

        let first = structure.braces.partition_point(|(offset, _)| *offset < open);
        let mut depth = 0usize;
        for &(offset, brace) in &structure.braces[first..] {
            match brace {
                Brace::Open => depth += 1,
                Brace::Close => {
                    let Some(remaining) = depth.checked_sub(1) else {
                        break;
                    };
                    depth = remaining;
                    if depth == 0 {
                        return Ok(Some(RuleBlock {
                            selector: selector.to_string(),
                            body: &css[open + 1..offset],
                            start_line: line_of(css, open),
                        }));
                    }
                }
            }
        }

        return Err(TokenError::css_parse(
            origin,
            line_of(css, open),
            format!("block for `{selector}` is never closed"),
        ));
    }

    Ok(None)
}

fn is_selector_boundary_before(css: &str, start: usize) -> bool {
    css[..start]
        .chars()
        .next_back()
        .is_none_or(|c| !(c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')))
}

/// Offset of the `{` that opens the rule, if `selector` ends a selector-list entry.
///
/// Accepts `sel {` and `sel, .other {` but rejects `sel-dark {` or a
/// selector that appears inside a declaration value.
fn opening_brace_after(css: &str, after: usize) -> Option<usize> {
    let rest = &css[after..];
    let next = rest.chars().next()?;
    if next.is_alphanumeric() || matches!(next, '-' | '_' | '.' | ':' | '[') {
        return None;
    }

    let brace = rest.find('{')?;
    let between = &rest[..brace];
    let trimmed = between.trim();
    let is_selector_list =
        trimmed.is_empty() || (trimmed.starts_with(',') && !between.contains([';', '}']));
    is_selector_list.then_some(after + brace)
}
