//! Tokenization sources
//!
//! The host editor's tokenizer/theme engine is an external service. Everything
//! that needs tokens goes through [`TokenSource`], so comparison and snapshot
//! logic can run against a fake deterministic source in tests.

use std::fs;
use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::error::{ColorizeError, Result};
use crate::tokens::{parse_tokens, TokenSequence};

/// Maximum fixture size accepted for capture (50 MB)
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Produces the token stream for one source file
///
/// Sources are shared across the worker threads of a batch, hence `Sync`.
pub trait TokenSource: Sync {
    fn capture_tokens(&self, path: &Path) -> Result<TokenSequence>;
}

impl<F> TokenSource for F
where
    F: Fn(&Path) -> Result<TokenSequence> + Sync,
{
    fn capture_tokens(&self, path: &Path) -> Result<TokenSequence> {
        self(path)
    }
}

/// External tokenizer command as configured
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerCommand {
    /// Executable to run
    #[serde(default)]
    pub program: Option<String>,
    /// Arguments placed before the file path
    #[serde(default)]
    pub args: Vec<String>,
}

/// Runs an external tokenizer and reads a token JSON array from its stdout
///
/// The file path is appended as the last argument.
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
}

impl CommandSource {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from configuration; `None` when no program is configured
    pub fn from_config(command: &TokenizerCommand) -> Option<Self> {
        command
            .program
            .as_ref()
            .map(|program| Self::new(program.clone(), command.args.clone()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl TokenSource for CommandSource {
    fn capture_tokens(&self, path: &Path) -> Result<TokenSequence> {
        tracing::debug!("Running tokenizer {} for {}", self.program, path.display());

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|e| {
                ColorizeError::capture(path, format!("tokenizer `{}` unavailable: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ColorizeError::capture(
                path,
                format!("tokenizer exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| ColorizeError::capture(path, format!("tokenizer output is not UTF-8: {}", e)))?;

        parse_tokens(&stdout, &format!("tokenizer output for {}", path.display()))
            .map_err(|e| ColorizeError::capture(path, e.to_string()))
    }
}

/// Check that a path names a readable, regular file of reasonable size
///
/// Runs before the tokenizer is invoked so a missing fixture is reported as a
/// capture failure rather than whatever the host makes of it.
pub fn validate_source_file(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| {
        let reason = match e.kind() {
            std::io::ErrorKind::NotFound => "file not found".to_string(),
            std::io::ErrorKind::PermissionDenied => "permission denied".to_string(),
            _ => e.to_string(),
        };
        ColorizeError::capture(path, reason)
    })?;

    if metadata.is_dir() {
        return Err(ColorizeError::capture(path, "is a directory"));
    }

    if metadata.len() > MAX_FILE_SIZE {
        return Err(ColorizeError::capture(
            path,
            format!(
                "file too large ({:.1} MB, max {} MB)",
                metadata.len() as f64 / (1024.0 * 1024.0),
                MAX_FILE_SIZE / (1024 * 1024)
            ),
        ));
    }

    fs::File::open(path).map_err(|e| ColorizeError::capture(path, e.to_string()))?;
    Ok(())
}
