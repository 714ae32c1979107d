// ABOUTME: Aggregated validation report with summary and detailed renderings
// ABOUTME: Also decides the process exit code for a completed run

use std::fmt::Write as _;

use clap::ValueEnum;
use swatch_types::{Category, MismatchKind, ValidationResult};

/// Mismatches listed per pair in summary mode
pub const SUMMARY_PREVIEW: usize = 3;

pub const EXIT_PASSED: u8 = 0;
pub const EXIT_FAILED: u8 = 1;
pub const EXIT_FATAL: u8 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportMode {
    /// One line per pair plus a short preview of mismatches
    #[default]
    Summary,
    /// Every mismatch of every pair
    Detailed,
}

/// A target file that could not be read or parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub category: Category,
    pub file: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    results: Vec<ValidationResult>,
    failures: Vec<FileFailure>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_result(&mut self, result: ValidationResult) {
        self.results.push(result);
    }

    pub fn push_failure(&mut self, failure: FileFailure) {
        self.failures.push(failure);
    }

    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    pub fn failures(&self) -> &[FileFailure] {
        &self.failures
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty() && self.results.iter().all(ValidationResult::passed)
    }

    pub fn exit_code(&self) -> u8 {
        if self.passed() { EXIT_PASSED } else { EXIT_FAILED }
    }

    pub fn count_of(&self, kind: MismatchKind) -> usize {
        self.results.iter().map(|r| r.count_of(kind)).sum()
    }

    pub fn render(&self, mode: ReportMode) -> String {
        let mut out = String::new();

        for category in Category::ALL {
            let results: Vec<_> = self
                .results
                .iter()
                .filter(|r| r.category == category)
                .collect();
            let failures: Vec<_> = self
                .failures
                .iter()
                .filter(|f| f.category == category)
                .collect();
            if results.is_empty() && failures.is_empty() {
                continue;
            }

            let _ = writeln!(out, "{category}:");
            for result in results {
                render_result(&mut out, result, mode);
            }
            for failure in failures {
                let _ = writeln!(out, "  ✗ {}: {}", failure.file, failure.error);
            }
        }

        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&self.summary_line());
        out.push('\n');
        out
    }

    fn summary_line(&self) -> String {
        let passed = self.results.iter().filter(|r| r.passed()).count();
        let mut line = format!(
            "{} {} pair(s) checked, {} passed, {} failed ({} {}, {} {}, {} {})",
            if self.passed() { "PASS" } else { "FAIL" },
            self.results.len(),
            passed,
            self.results.len() - passed,
            self.count_of(MismatchKind::MissingKey),
            MismatchKind::MissingKey.label(),
            self.count_of(MismatchKind::ExtraKey),
            MismatchKind::ExtraKey.label(),
            self.count_of(MismatchKind::DescriptionMismatch),
            MismatchKind::DescriptionMismatch.label(),
        );
        if !self.failures.is_empty() {
            let _ = write!(line, ", {} unreadable file(s)", self.failures.len());
        }
        line
    }
}

fn render_result(out: &mut String, result: &ValidationResult, mode: ReportMode) {
    if result.passed() {
        let _ = writeln!(
            out,
            "  ✓ {} matches {}",
            result.target_file, result.source_file
        );
        return;
    }

    let mismatches = result.mismatches();
    let _ = writeln!(
        out,
        "  ✗ {} differs from {}: {} mismatch(es)",
        result.target_file,
        result.source_file,
        mismatches.len()
    );

    let shown = match mode {
        ReportMode::Summary => SUMMARY_PREVIEW.min(mismatches.len()),
        ReportMode::Detailed => mismatches.len(),
    };
    for mismatch in &mismatches[..shown] {
        let _ = writeln!(out, "      - {mismatch}");
    }
    if shown < mismatches.len() {
        let _ = writeln!(out, "      ... and {} more", mismatches.len() - shown);
    }
}
