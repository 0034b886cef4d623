/// OWNERS include linting
///
/// OWNERS files can pull in other OWNERS files with either
/// `include <path>` or `file: <path>`. This module finds directives whose
/// target does not exist and reports their line numbers as JSON:
///
/// ```text
/// [
///   {
///     "lines": [
///       3
///     ]
///   }
/// ]
/// ```
///
/// Broken includes are findings, not failures: they only show up in the
/// report. Unreadable input files are errors for the caller to surface.
pub mod checker;

#[cfg(test)]
mod checker_tests;

pub use checker::{extract_include, OwnersIncludeChecker};

use serde::Serialize;

/// Line numbers (1-based) of broken include directives in one OWNERS file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BrokenIncludeReport {
    pub lines: Vec<usize>,
}

impl BrokenIncludeReport {
    pub fn is_clean(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Render reports as a JSON array with 2-space indentation
pub fn render_reports(reports: &[BrokenIncludeReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}
