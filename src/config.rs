//! Colorization configuration
//!
//! Read from YAML. Lookup order: an explicit `--config` path, then
//! `./colorsnap.yaml`, then `~/.config/colorsnap/config.yaml`, then defaults.
//!
//! ```yaml
//! fixtures_dir: test/colorize-fixtures
//! results_dir: test/colorize-results
//! fixture_extensions: [js]
//! themes: [Dark+, Light+]
//! tokenizer:
//!   program: code-tokens
//!   args: [--themes, all]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::source::TokenizerCommand;
use crate::tokens::OutputFormat;

/// Settings shared by every subcommand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorizeConfig {
    /// Directory holding the source fixtures
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: PathBuf,
    /// Directory holding one baseline per fixture
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    /// Destination of export-mode runs
    #[serde(default = "default_exports_dir")]
    pub exports_dir: PathBuf,
    /// Fixture file extensions without the dot; empty accepts all files
    #[serde(default)]
    pub fixture_extensions: Vec<String>,
    #[serde(default)]
    pub format: OutputFormat,
    /// Themes kept in captures; empty keeps all
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub tokenizer: TokenizerCommand,
}

fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("test/colorize-fixtures")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("test/colorize-results")
}

fn default_exports_dir() -> PathBuf {
    PathBuf::from("test/colorize-exports")
}

impl Default for ColorizeConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: default_fixtures_dir(),
            results_dir: default_results_dir(),
            exports_dir: default_exports_dir(),
            fixture_extensions: Vec::new(),
            format: OutputFormat::default(),
            themes: Vec::new(),
            tokenizer: TokenizerCommand::default(),
        }
    }
}

impl ColorizeConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))
    }

    /// Load an explicitly requested config file; errors are fatal
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        let config = Self::from_yaml(&content)
            .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve configuration
    ///
    /// An explicit path must load. Otherwise the project file, then the user
    /// file are tried; unreadable or invalid implicit files fall back to
    /// defaults with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self, String> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let candidates = std::iter::once(crate::config_paths::project_config_file())
            .chain(crate::config_paths::config_file());

        for path in candidates {
            if !path.exists() {
                tracing::debug!("Config file not found at {}", path.display());
                continue;
            }
            return Ok(Self::from_file(&path).unwrap_or_else(|e| {
                tracing::warn!("{}; using defaults", e);
                Self::default()
            }));
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Serialize to YAML, e.g. for `colorsnap` to print its effective config
    pub fn to_yaml(&self) -> Result<String, String> {
        serde_yaml::to_string(self).map_err(|e| format!("Failed to serialize config: {}", e))
    }
}
