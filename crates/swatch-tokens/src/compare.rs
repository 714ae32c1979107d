// ABOUTME: Consistency comparator between a source-of-truth token tree and a sibling variant
// ABOUTME: Emits missing keys, then extra keys, then description drift, in declaration order

use swatch_types::{Category, Mismatch, TokenTree, ValidationResult};

/// Compare `target` against the `source` of truth.
///
/// Description equality is only checked when `check_descriptions` is set;
/// callers decide this per category pair rather than the comparator
/// inferring it. Output order is: missing keys in source order, extra keys
/// in target order, description mismatches in source order.
pub fn compare(source: &TokenTree, target: &TokenTree, check_descriptions: bool) -> Vec<Mismatch> {
    let mut mismatches: Vec<Mismatch> = source
        .names()
        .filter(|name| !target.contains(name))
        .map(|name| Mismatch::MissingKey {
            path: name.to_string(),
            source_file: source.origin.clone(),
        })
        .collect();

    mismatches.extend(
        target
            .names()
            .filter(|name| !source.contains(name))
            .map(|name| Mismatch::ExtraKey {
                path: name.to_string(),
                target_file: target.origin.clone(),
            }),
    );

    if check_descriptions {
        for (name, expected) in source.iter() {
            let Some(actual) = target.get(name) else {
                continue;
            };
            if expected.description != actual.description {
                mismatches.push(Mismatch::DescriptionMismatch {
                    path: name.to_string(),
                    expected: expected.description.clone(),
                    actual: actual.description.clone(),
                });
            }
        }
    }

    mismatches
}

/// Compare one pair and wrap the outcome for reporting.
pub fn validate_pair(
    category: Category,
    source: &TokenTree,
    target: &TokenTree,
    check_descriptions: bool,
) -> ValidationResult {
    let mismatches = compare(source, target, check_descriptions);
    swatch_logging::debug!(
        category = %category,
        source = %source.origin,
        target = %target.origin,
        mismatches = mismatches.len(),
        "Compared token trees"
    );
    ValidationResult::new(category, &source.origin, &target.origin, mismatches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::parse_json_tokens;
    use swatch_types::{MismatchKind, TokenRecord};

    fn tree(origin: &str, entries: &[(&str, &str)]) -> TokenTree {
        entries
            .iter()
            .map(|(name, description)| (name.to_string(), TokenRecord::new("v", *description)))
            .collect::<TokenTree>()
            .with_origin(origin)
    }

    fn paths(mismatches: &[Mismatch], kind: MismatchKind) -> Vec<String> {
        mismatches
            .iter()
            .filter(|m| m.kind() == kind)
            .map(|m| m.path().to_string())
            .collect()
    }

    #[test]
    fn test_missing_key_against_empty_target() {
        let source = parse_json_tokens(r#"{"a": {"$value": "1px", "$description": "x"}}"#, "src.json")
            .unwrap();
        let target = parse_json_tokens("{}", "dst.json").unwrap();

        let mismatches = compare(&source, &target, false);
        assert_eq!(
            mismatches,
            vec![Mismatch::MissingKey {
                path: "a".to_string(),
                source_file: "src.json".to_string(),
            }]
        );
    }

    #[test]
    fn test_description_drift_between_modes() {
        let light = parse_json_tokens(
            r##"{"surface": {"DEFAULT": {"$value": "#fff", "$description": "bg"}}}"##,
            "light.json",
        )
        .unwrap();
        let dark = parse_json_tokens(
            r##"{"surface": {"DEFAULT": {"$value": "#000", "$description": "background"}}}"##,
            "dark.json",
        )
        .unwrap();

        let mismatches = compare(&light, &dark, true);
        assert_eq!(
            mismatches,
            vec![Mismatch::DescriptionMismatch {
                path: "surface.DEFAULT".to_string(),
                expected: "bg".to_string(),
                actual: "background".to_string(),
            }]
        );

        assert!(compare(&light, &dark, false).is_empty());
    }

    #[test]
    fn test_values_are_never_compared() {
        let source = tree("a.json", &[("x", "same")]);
        let mut target = TokenTree::new("b.json");
        target.insert("x", TokenRecord::new("different value", "same"));
        assert!(compare(&source, &target, true).is_empty());
    }

    #[test]
    fn test_missing_and_extra_are_symmetric() {
        let a = tree("a.css", &[("p", ""), ("q", ""), ("r", "")]);
        let b = tree("b.css", &[("q", ""), ("s", ""), ("t", "")]);

        let forward = compare(&a, &b, false);
        let backward = compare(&b, &a, false);

        assert_eq!(
            paths(&forward, MismatchKind::MissingKey),
            paths(&backward, MismatchKind::ExtraKey)
        );
        assert_eq!(
            paths(&forward, MismatchKind::ExtraKey),
            paths(&backward, MismatchKind::MissingKey)
        );
    }

    #[test]
    fn test_ordering_missing_then_extra_then_description() {
        let source = tree("light.json", &[("shared", "one"), ("gone", "")]);
        let target = tree("dark.json", &[("new", ""), ("shared", "two")]);

        let kinds: Vec<_> = compare(&source, &target, true)
            .iter()
            .map(Mismatch::kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                MismatchKind::MissingKey,
                MismatchKind::ExtraKey,
                MismatchKind::DescriptionMismatch
            ]
        );
    }

    #[test]
    fn test_empty_description_differs_from_present_one() {
        let source = tree("light.json", &[("accent", "")]);
        let target = tree("dark.json", &[("accent", "Accent color")]);
        let mismatches = compare(&source, &target, true);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].kind(), MismatchKind::DescriptionMismatch);
    }

    #[test]
    fn test_validate_pair_wraps_result() {
        let source = tree("dusk.json", &[("radius.sm", "")]);
        let target = tree("dawn.json", &[("radius.sm", "")]);
        let result = validate_pair(Category::Themes, &source, &target, false);
        assert!(result.passed());
        assert_eq!(result.source_file, "dusk.json");
        assert_eq!(result.target_file, "dawn.json");
    }
}
