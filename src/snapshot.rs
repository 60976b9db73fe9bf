//! Snapshot policy
//!
//! Each fixture has a baseline capture under the results directory. A run
//! captures the fixture again and decides:
//!
//! - no baseline: write one, pass
//! - baseline equal: pass, no write
//! - only scopes or token boundaries moved (same length, same text, same
//!   colors): rewrite the baseline, pass
//! - text or color changed: rewrite the baseline, fail with the diff
//!
//! Export mode skips comparison and always rewrites. A failed run still
//! rewrites the baseline, so the next run compares against the new capture.

use std::path::{Path, PathBuf};

use crate::capture::{fan_out, Colorizer};
use crate::compare::{compare, ComparisonResult};
use crate::error::{ColorizeError, Result};
use crate::tokens::{self, baseline_path, ThemeColors, TokenRecord};

/// Whether a run checks against baselines or regenerates them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SnapshotMode {
    #[default]
    Check,
    Export,
}

/// What happened to one fixture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// No baseline existed; the capture became the baseline
    Created,
    /// Capture equals the baseline
    Passed,
    /// Cosmetic drift absorbed into the baseline
    UpdatedPass(ComparisonResult),
    /// Material change; baseline rewritten, run fails
    UpdatedFail(ComparisonResult),
    /// Export mode rewrote the baseline unconditionally
    Exported,
}

impl SnapshotOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::UpdatedFail(_))
    }

    /// The comparison behind an update, if one was computed
    pub fn comparison(&self) -> Option<&ComparisonResult> {
        match self {
            Self::UpdatedPass(c) | Self::UpdatedFail(c) => Some(c),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Passed => "unchanged",
            Self::UpdatedPass(_) => "updated (cosmetic)",
            Self::UpdatedFail(_) => "REGRESSED",
            Self::Exported => "exported",
        }
    }
}

/// How a changed capture relates to its baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Identical,
    /// Scope labels differ but text and colors do not
    Cosmetic,
    /// Length, text or color differs
    Material,
}

/// Classify the change from `baseline` to `current`
///
/// Scope is not part of the tolerant check: a pure scope rename with
/// identical text and rendering never fails.
pub fn classify(baseline: &[TokenRecord], current: &[TokenRecord]) -> Change {
    if baseline == current {
        return Change::Identical;
    }
    if baseline.len() != current.len() {
        return Change::Material;
    }
    let material = current.iter().zip(baseline).any(|(now, before)| {
        now.content != before.content || has_theme_change(&now.theme_colors, &before.theme_colors)
    });
    if material {
        Change::Material
    } else {
        Change::Cosmetic
    }
}

/// True if any theme in `current` renders differently than in `previous`
///
/// Only themes present in the current capture are checked, so a theme that
/// disappears from the capture alone is not a color change.
pub fn has_theme_change(current: &ThemeColors, previous: &ThemeColors) -> bool {
    current
        .iter()
        .any(|(theme, color)| previous.get(theme) != Some(color))
}

/// Runs the snapshot policy for fixtures against one results directory
pub struct SnapshotRunner<'a> {
    colorizer: Colorizer<'a>,
    results_dir: PathBuf,
}

impl<'a> SnapshotRunner<'a> {
    pub fn new(colorizer: Colorizer<'a>, results_dir: impl Into<PathBuf>) -> Self {
        Self {
            colorizer,
            results_dir: results_dir.into(),
        }
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Baseline file backing a fixture
    pub fn baseline_for(&self, fixture: &Path) -> PathBuf {
        baseline_path(&self.results_dir, fixture)
    }

    /// Apply the policy to one fixture
    ///
    /// Capture, baseline load, comparison and write happen strictly in that
    /// order. A baseline that cannot be parsed fails this fixture and is left
    /// untouched.
    pub fn run(&self, fixture: &Path, mode: SnapshotMode) -> Result<SnapshotOutcome> {
        let current = self.colorizer.capture(fixture)?;
        let baseline_file = self.baseline_for(fixture);
        let format = self.colorizer.format();

        if mode == SnapshotMode::Export {
            tokens::write_to_file(&current, &baseline_file, format)?;
            tracing::info!("Exported {}", baseline_file.display());
            return Ok(SnapshotOutcome::Exported);
        }

        let exists = baseline_file
            .try_exists()
            .map_err(|e| ColorizeError::io(&baseline_file, e))?;
        if !exists {
            tokens::write_to_file(&current, &baseline_file, format)?;
            tracing::info!("Created baseline {}", baseline_file.display());
            return Ok(SnapshotOutcome::Created);
        }

        let baseline = tokens::read_from_file(&baseline_file)?;
        let change = classify(&baseline, &current);
        if change == Change::Identical {
            tracing::debug!("{} matches baseline", fixture.display());
            return Ok(SnapshotOutcome::Passed);
        }

        // Logged before the rewrite: a failed write must not lose the diff
        let comparison = compare(&baseline, &current);
        if change == Change::Cosmetic {
            tracing::info!(
                "Cosmetic drift in {}: {}",
                fixture.display(),
                comparison.summary()
            );
        } else {
            tracing::warn!(
                "Colorization of {} changed: {}",
                fixture.display(),
                comparison.summary()
            );
        }

        tokens::write_to_file(&current, &baseline_file, format)?;
        tracing::info!("Updated baseline {}", baseline_file.display());

        if change == Change::Cosmetic {
            Ok(SnapshotOutcome::UpdatedPass(comparison))
        } else {
            Ok(SnapshotOutcome::UpdatedFail(comparison))
        }
    }

    /// Check one fixture against its baseline
    pub fn assert_unchanged(&self, fixture: &Path) -> Result<SnapshotOutcome> {
        self.run(fixture, SnapshotMode::Check)
    }

    /// Capture one fixture and overwrite its baseline
    pub fn export(&self, fixture: &Path) -> Result<SnapshotOutcome> {
        self.run(fixture, SnapshotMode::Export)
    }

    /// Apply the policy to every fixture; one fixture never aborts another
    pub fn run_suite(&self, fixtures: &[PathBuf], mode: SnapshotMode) -> SuiteReport {
        let fixtures = fan_out(fixtures, |fixture| self.run(fixture, mode))
            .into_iter()
            .map(|(fixture, result)| {
                if let Err(e) = &result {
                    tracing::warn!("Fixture {} failed: {}", fixture.display(), e);
                }
                FixtureResult { fixture, result }
            })
            .collect();
        SuiteReport { fixtures }
    }
}

/// Result of one fixture within a suite
#[derive(Debug)]
pub struct FixtureResult {
    pub fixture: PathBuf,
    pub result: Result<SnapshotOutcome>,
}

impl FixtureResult {
    pub fn is_success(&self) -> bool {
        self.result.as_ref().is_ok_and(SnapshotOutcome::is_success)
    }
}

/// Accumulated results of a suite run, in fixture order
#[derive(Debug, Default)]
pub struct SuiteReport {
    pub fixtures: Vec<FixtureResult>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.fixtures.iter().filter(|f| f.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.fixtures.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.fixtures.iter().all(FixtureResult::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FixtureResult> {
        self.fixtures.iter().filter(|f| !f.is_success())
    }
}
