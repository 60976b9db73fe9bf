//! Token capture
//!
//! Wraps a [`TokenSource`] with path validation, theme filtering and output
//! writing. Batches fan out over scoped worker threads; a failure on one file
//! is logged and recorded in the [`BatchReport`] without stopping the others.

use std::collections::BTreeMap;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::error::{ColorizeError, Result};
use crate::source::{validate_source_file, TokenSource};
use crate::tokens::{self, baseline_path, filter_themes, OutputFormat, TokenSequence};

/// Captures tokens through a [`TokenSource`]
pub struct Colorizer<'a> {
    source: &'a dyn TokenSource,
    format: OutputFormat,
    themes: Vec<String>,
}

impl<'a> Colorizer<'a> {
    pub fn new(source: &'a dyn TokenSource) -> Self {
        Self {
            source,
            format: OutputFormat::default(),
            themes: Vec::new(),
        }
    }

    /// Layout used for every file this colorizer writes
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Keep only these themes in captured records (empty keeps all)
    pub fn with_themes(mut self, themes: Vec<String>) -> Self {
        self.themes = themes;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Capture one file
    pub fn capture(&self, path: &Path) -> Result<TokenSequence> {
        validate_source_file(path)?;
        let mut tokens = self.source.capture_tokens(path)?;
        filter_themes(&mut tokens, &self.themes);
        Ok(tokens)
    }

    /// Capture one file and write the result to `output`
    pub fn capture_to_file(&self, path: &Path, output: &Path) -> Result<TokenSequence> {
        let tokens = self.capture(path)?;
        tokens::write_to_file(&tokens, output, self.format)?;
        Ok(tokens)
    }

    /// Capture several files independently
    ///
    /// With an output directory, each capture is written to its baseline file
    /// name inside it. Only failing to create that directory aborts the batch.
    pub fn capture_many(&self, paths: &[PathBuf], output_dir: Option<&Path>) -> Result<BatchReport> {
        if let Some(dir) = output_dir {
            fs::create_dir_all(dir).map_err(|e| ColorizeError::io(dir, e))?;
            warn_on_shared_outputs(paths, dir);
        }

        let results = fan_out(paths, |path| match output_dir {
            Some(dir) => self.capture_to_file(path, &baseline_path(dir, path)),
            None => self.capture(path),
        });

        let mut report = BatchReport::default();
        for (path, result) in results {
            match result {
                Ok(tokens) => {
                    tracing::info!("Colorized {} ({} tokens)", path.display(), tokens.len());
                    report.captured.insert(path, tokens);
                }
                Err(e) => {
                    tracing::warn!("Failed to colorize {}: {}", path.display(), e);
                    report.failures.push(FileFailure { path, error: e });
                }
            }
        }
        Ok(report)
    }

    /// Capture every fixture in `fixtures_dir` into `results_dir`
    pub fn capture_fixtures(
        &self,
        fixtures_dir: &Path,
        results_dir: &Path,
        extensions: &[String],
    ) -> Result<BatchReport> {
        let fixtures = discover_fixtures(fixtures_dir, extensions)?;
        tracing::info!(
            "Colorizing {} fixtures from {}",
            fixtures.len(),
            fixtures_dir.display()
        );
        self.capture_many(&fixtures, Some(results_dir))
    }
}

/// Warn about inputs that would overwrite each other's output file
///
/// Returns the output paths claimed by more than one input.
fn warn_on_shared_outputs(paths: &[PathBuf], output_dir: &Path) -> Vec<PathBuf> {
    let mut claimed: BTreeMap<PathBuf, &Path> = BTreeMap::new();
    let mut shared = Vec::new();
    for path in paths {
        let output = baseline_path(output_dir, path);
        match claimed.get(&output) {
            Some(first) => {
                tracing::warn!(
                    "{} and {} both write {}; only one capture will be kept",
                    first.display(),
                    path.display(),
                    output.display()
                );
                if !shared.contains(&output) {
                    shared.push(output);
                }
            }
            None => {
                claimed.insert(output, path.as_path());
            }
        }
    }
    shared
}

/// A file that could not be captured or written
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: ColorizeError,
}

/// Accumulated results of one batch
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successful captures keyed by input path
    pub captured: BTreeMap<PathBuf, TokenSequence>,
    /// Failures in input order
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn file_count(&self) -> usize {
        self.captured.len()
    }

    pub fn token_count(&self) -> usize {
        tokens::total_tokens(self.captured.values())
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// List fixture files in a directory, sorted by name
///
/// `extensions` are matched without the leading dot; empty accepts all files.
pub fn discover_fixtures(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ColorizeError::MissingFixtures(dir.to_path_buf()));
    }

    let mut fixtures: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| ColorizeError::io(dir, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            extensions.is_empty()
                || path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| extensions.iter().any(|e| e.trim_start_matches('.') == ext))
        })
        .collect();

    fixtures.sort();
    Ok(fixtures)
}

/// Run `work` for every path on scoped worker threads, preserving input order
///
/// At most one worker per available core runs at a time. A panicking worker is
/// reported as a capture failure for its path.
pub(crate) fn fan_out<T, F>(paths: &[PathBuf], work: F) -> Vec<(PathBuf, Result<T>)>
where
    T: Send,
    F: Fn(&Path) -> Result<T> + Sync,
{
    let workers = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4);

    let work = &work;
    let mut results = Vec::with_capacity(paths.len());
    for chunk in paths.chunks(workers) {
        std::thread::scope(|scope| {
            let handles: Vec<_> = chunk
                .iter()
                .map(|path| (path, scope.spawn(move || work(path.as_path()))))
                .collect();

            for (path, handle) in handles {
                let result = handle
                    .join()
                    .unwrap_or_else(|_| Err(ColorizeError::capture(path, "capture worker panicked")));
                results.push((path.clone(), result));
            }
        });
    }
    results
}
