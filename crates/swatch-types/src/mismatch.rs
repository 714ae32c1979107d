// ABOUTME: Mismatch variants produced by the consistency comparator
// ABOUTME: Also holds the per-pair validation result and the category enum

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis along which token files are expected to stay consistent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Light/dark semantic mode files
    Modes,
    /// Brand themes (shadows, radii, gradients)
    Themes,
    /// Numbered color ramps
    Palettes,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Modes, Category::Themes, Category::Palettes];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Modes => "modes",
            Category::Themes => "themes",
            Category::Palettes => "palettes",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structural or descriptive difference between two token trees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mismatch {
    /// Present in the source of truth, absent from the target
    MissingKey { path: String, source_file: String },
    /// Present in the target, absent from the source of truth
    ExtraKey { path: String, target_file: String },
    /// Same key in both, different description
    DescriptionMismatch {
        path: String,
        expected: String,
        actual: String,
    },
}

impl Mismatch {
    pub fn kind(&self) -> MismatchKind {
        match self {
            Mismatch::MissingKey { .. } => MismatchKind::MissingKey,
            Mismatch::ExtraKey { .. } => MismatchKind::ExtraKey,
            Mismatch::DescriptionMismatch { .. } => MismatchKind::DescriptionMismatch,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Mismatch::MissingKey { path, .. }
            | Mismatch::ExtraKey { path, .. }
            | Mismatch::DescriptionMismatch { path, .. } => path,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::MissingKey { path, source_file } => {
                write!(f, "missing key `{path}` (defined in {source_file})")
            }
            Mismatch::ExtraKey { path, target_file } => {
                write!(f, "extra key `{path}` (only in {target_file})")
            }
            Mismatch::DescriptionMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "description mismatch at `{path}`: expected {expected:?}, found {actual:?}"
            ),
        }
    }
}

/// Mismatch discriminant, used for aggregate counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    MissingKey,
    ExtraKey,
    DescriptionMismatch,
}

impl MismatchKind {
    pub fn label(&self) -> &'static str {
        match self {
            MismatchKind::MissingKey => "missing",
            MismatchKind::ExtraKey => "extra",
            MismatchKind::DescriptionMismatch => "description",
        }
    }
}

/// Outcome of comparing one target file against its source of truth.
///
/// Built once per pair and never mutated; `passed` always mirrors an empty
/// mismatch list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub category: Category,
    pub source_file: String,
    pub target_file: String,
    mismatches: Vec<Mismatch>,
    passed: bool,
}

impl ValidationResult {
    pub fn new(
        category: Category,
        source_file: impl Into<String>,
        target_file: impl Into<String>,
        mismatches: Vec<Mismatch>,
    ) -> Self {
        let passed = mismatches.is_empty();
        Self {
            category,
            source_file: source_file.into(),
            target_file: target_file.into(),
            mismatches,
            passed,
        }
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    pub fn count_of(&self, kind: MismatchKind) -> usize {
        self.mismatches.iter().filter(|m| m.kind() == kind).count()
    }
}
