//! Token comparison
//!
//! Walks two captures pairwise and reports every content, scope and theme
//! discrepancy, in index order. Records past the shorter capture are never
//! compared individually; a length mismatch becomes a single synthetic entry.

use std::fmt;

use serde::Serialize;

use crate::tokens::{ThemeColors, TokenRecord};

/// What differed at a token index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Content,
    Scope,
    Theme,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content => write!(f, "content"),
            Self::Scope => write!(f, "scope"),
            Self::Theme => write!(f, "theme"),
        }
    }
}

/// One side of a difference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DiffValue {
    /// Token content or scope
    Text(String),
    /// Full theme color map of the token
    Colors(ThemeColors),
    /// Capture length, for the synthetic length-mismatch entry
    Length(usize),
}

impl fmt::Display for DiffValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(len) => write!(f, "Length: {}", len),
            Self::Text(text) => match serde_json::to_string(text) {
                Ok(json) => f.write_str(&json),
                Err(_) => write!(f, "{:?}", text),
            },
            Self::Colors(colors) => match serde_json::to_string(colors) {
                Ok(json) => f.write_str(&json),
                Err(_) => write!(f, "{:?}", colors),
            },
        }
    }
}

/// A discrepancy between baseline and current capture at one index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffEntry {
    pub index: usize,
    pub kind: DiffKind,
    pub expected: DiffValue,
    pub actual: DiffValue,
}

/// Outcome of [`compare`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    /// True iff `diffs` is empty
    pub identical: bool,
    pub diffs: Vec<DiffEntry>,
}

impl Default for ComparisonResult {
    fn default() -> Self {
        Self::from_diffs(Vec::new())
    }
}

impl ComparisonResult {
    fn from_diffs(diffs: Vec<DiffEntry>) -> Self {
        Self {
            identical: diffs.is_empty(),
            diffs,
        }
    }

    /// Number of entries of the given kind
    pub fn count(&self, kind: DiffKind) -> usize {
        self.diffs.iter().filter(|d| d.kind == kind).count()
    }

    /// One-line summary, e.g. `3 differences (1 content, 2 scope, 0 theme)`
    pub fn summary(&self) -> String {
        if self.identical {
            return "no differences".to_string();
        }
        format!(
            "{} difference{} ({} content, {} scope, {} theme)",
            self.diffs.len(),
            if self.diffs.len() == 1 { "" } else { "s" },
            self.count(DiffKind::Content),
            self.count(DiffKind::Scope),
            self.count(DiffKind::Theme),
        )
    }
}

/// Compare a baseline capture against a current one
pub fn compare(baseline: &[TokenRecord], current: &[TokenRecord]) -> ComparisonResult {
    let mut diffs = Vec::new();
    let common = baseline.len().min(current.len());

    for (index, (expected, actual)) in baseline.iter().zip(current).enumerate() {
        if expected.content != actual.content {
            diffs.push(DiffEntry {
                index,
                kind: DiffKind::Content,
                expected: DiffValue::Text(expected.content.clone()),
                actual: DiffValue::Text(actual.content.clone()),
            });
        }

        if expected.scope != actual.scope {
            diffs.push(DiffEntry {
                index,
                kind: DiffKind::Scope,
                expected: DiffValue::Text(expected.scope.clone()),
                actual: DiffValue::Text(actual.scope.clone()),
            });
        }

        if theme_colors_differ(&expected.theme_colors, &actual.theme_colors) {
            diffs.push(DiffEntry {
                index,
                kind: DiffKind::Theme,
                expected: DiffValue::Colors(expected.theme_colors.clone()),
                actual: DiffValue::Colors(actual.theme_colors.clone()),
            });
        }
    }

    if baseline.len() != current.len() {
        diffs.push(DiffEntry {
            index: common,
            kind: DiffKind::Content,
            expected: DiffValue::Length(baseline.len()),
            actual: DiffValue::Length(current.len()),
        });
    }

    ComparisonResult::from_diffs(diffs)
}

/// Names of themes whose color differs, over the union of both key sets
///
/// A theme present on one side only counts as a difference.
pub fn changed_themes<'a>(expected: &'a ThemeColors, actual: &'a ThemeColors) -> Vec<&'a str> {
    let mut changed: Vec<&str> = expected
        .iter()
        .filter(|(theme, color)| actual.get(*theme) != Some(*color))
        .map(|(theme, _)| theme.as_str())
        .collect();
    changed.extend(
        actual
            .keys()
            .filter(|theme| !expected.contains_key(*theme))
            .map(String::as_str),
    );
    changed.sort_unstable();
    changed
}

fn theme_colors_differ(expected: &ThemeColors, actual: &ThemeColors) -> bool {
    !changed_themes(expected, actual).is_empty()
}

/// Human-readable report, one block per difference
///
/// ```text
/// Difference 1 at token 4:
///   Type: theme
///   Expected: {"dark":"#fff"}
///   Actual: {"dark":"#000"}
/// ```
pub fn render_report(result: &ComparisonResult) -> String {
    result
        .diffs
        .iter()
        .enumerate()
        .map(|(n, diff)| {
            format!(
                "Difference {} at token {}:\n  Type: {}\n  Expected: {}\n  Actual: {}\n",
                n + 1,
                diff.index,
                diff.kind,
                diff.expected,
                diff.actual
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
