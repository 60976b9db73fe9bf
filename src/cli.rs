//! Command-line argument parsing
//!
//! Supports:
//! - Colorizing one file, a set of files, or every fixture
//! - Comparing a baseline file against a fresh capture
//! - Running the snapshot check over all fixtures, or exporting them

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::ColorizeConfig;
use crate::snapshot::SnapshotMode;
use crate::tokens::OutputFormat;

/// Export and compare editor colorization snapshots
#[derive(Parser, Debug)]
#[command(
    name = "colorsnap",
    version,
    about = "Export and compare editor colorization snapshots"
)]
pub struct CliArgs {
    /// Config file (default: ./colorsnap.yaml, then ~/.config/colorsnap/config.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Tokenizer program, overriding the configured one
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub tokenizer: Option<String>,

    /// Argument passed to the tokenizer before the file path (repeatable)
    #[arg(
        long = "tokenizer-arg",
        global = true,
        value_name = "ARG",
        allow_hyphen_values = true
    )]
    pub tokenizer_args: Vec<String>,

    /// Keep only this theme in captures (repeatable)
    #[arg(long = "theme", global = true, value_name = "NAME")]
    pub themes: Vec<String>,

    /// Write compact JSON instead of tab-indented JSON
    #[arg(long, global = true)]
    pub compact: bool,

    /// Debug-level console logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Colorize one file and save its tokens
    Colorize {
        /// Source file to colorize
        file: PathBuf,
        /// Output JSON path (default: <file stem>_colorized.json next to the file)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Colorize several files into a directory
    Batch {
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,
        #[arg(long, value_name = "DIR")]
        out_dir: PathBuf,
    },
    /// Colorize every fixture into the results directory
    Fixtures {
        /// Override the configured results directory
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
    /// Compare a baseline JSON file against a fresh capture of a source file
    Compare {
        baseline: PathBuf,
        source: PathBuf,
        /// Rewrite the baseline with the fresh capture when they differ
        #[arg(long)]
        update: bool,
        /// Print the comparison as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check every fixture against its baseline
    Test {
        /// Rewrite all baselines without comparing
        #[arg(long)]
        export: bool,
    },
    /// Export every fixture into the exports directory
    Export {
        /// Override the configured exports directory
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

/// Work to perform, with paths resolved against the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Colorize {
        file: PathBuf,
        output: PathBuf,
    },
    Batch {
        files: Vec<PathBuf>,
        out_dir: PathBuf,
    },
    Fixtures {
        fixtures_dir: PathBuf,
        results_dir: PathBuf,
    },
    Compare {
        baseline: PathBuf,
        source: PathBuf,
        update: bool,
        json: bool,
    },
    Suite {
        fixtures_dir: PathBuf,
        results_dir: PathBuf,
        mode: SnapshotMode,
    },
    ShowConfig,
}

impl CliArgs {
    /// Merge CLI overrides into `config` and resolve the task
    pub fn into_task(self, mut config: ColorizeConfig) -> Result<(Task, ColorizeConfig), String> {
        if let Some(program) = self.tokenizer {
            config.tokenizer.program = Some(program);
            config.tokenizer.args = self.tokenizer_args;
        } else if !self.tokenizer_args.is_empty() {
            if config.tokenizer.program.is_none() {
                return Err("--tokenizer-arg requires a tokenizer program".to_string());
            }
            config.tokenizer.args = self.tokenizer_args;
        }
        if !self.themes.is_empty() {
            config.themes = self.themes;
        }
        if self.compact {
            config.format = OutputFormat::Compact;
        }

        let task = match self.command {
            CliCommand::Colorize { file, output } => {
                let output = output.unwrap_or_else(|| default_output_path(&file));
                if output == file {
                    return Err(format!(
                        "Output path {} would overwrite the source file",
                        output.display()
                    ));
                }
                Task::Colorize { file, output }
            }
            CliCommand::Batch { files, out_dir } => Task::Batch { files, out_dir },
            CliCommand::Fixtures { out_dir } => Task::Fixtures {
                fixtures_dir: config.fixtures_dir.clone(),
                results_dir: out_dir.unwrap_or_else(|| config.results_dir.clone()),
            },
            CliCommand::Compare {
                baseline,
                source,
                update,
                json,
            } => Task::Compare {
                baseline,
                source,
                update,
                json,
            },
            CliCommand::Test { export } => Task::Suite {
                fixtures_dir: config.fixtures_dir.clone(),
                results_dir: config.results_dir.clone(),
                mode: if export {
                    SnapshotMode::Export
                } else {
                    SnapshotMode::Check
                },
            },
            CliCommand::Export { out_dir } => Task::Suite {
                fixtures_dir: config.fixtures_dir.clone(),
                results_dir: out_dir.unwrap_or_else(|| config.exports_dir.clone()),
                mode: SnapshotMode::Export,
            },
            CliCommand::Config => Task::ShowConfig,
        };

        Ok((task, config))
    }
}

/// `src/example.js` → `src/example_colorized.json`
pub fn default_output_path(file: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    file.with_file_name(format!("{}_colorized.json", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("colorsnap").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_colorize_default_output() {
        let (task, _) = parse(&["colorize", "test/fixtures/example.js"])
            .into_task(ColorizeConfig::default())
            .unwrap();
        assert_eq!(
            task,
            Task::Colorize {
                file: PathBuf::from("test/fixtures/example.js"),
                output: PathBuf::from("test/fixtures/example_colorized.json"),
            }
        );
    }

    #[test]
    fn test_colorize_explicit_output() {
        let (task, _) = parse(&["colorize", "a.js", "-o", "out/a.json"])
            .into_task(ColorizeConfig::default())
            .unwrap();
        assert!(matches!(task, Task::Colorize { output, .. } if output == PathBuf::from("out/a.json")));
    }

    #[test]
    fn test_colorize_refuses_to_overwrite_source() {
        let result = parse(&["colorize", "a.json", "-o", "a.json"]).into_task(ColorizeConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_default_output_path_last_extension_only() {
        assert_eq!(
            default_output_path(Path::new("render.test.js")),
            PathBuf::from("render.test_colorized.json")
        );
        assert_eq!(
            default_output_path(Path::new("Makefile")),
            PathBuf::from("Makefile_colorized.json")
        );
    }

    #[test]
    fn test_batch_requires_files() {
        let result = CliArgs::try_parse_from(["colorsnap", "batch", "--out-dir", "out"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_fixtures_uses_config_dirs() {
        let config = ColorizeConfig {
            fixtures_dir: PathBuf::from("fx"),
            results_dir: PathBuf::from("res"),
            ..Default::default()
        };
        let (task, _) = parse(&["fixtures"]).into_task(config.clone()).unwrap();
        assert_eq!(
            task,
            Task::Fixtures {
                fixtures_dir: PathBuf::from("fx"),
                results_dir: PathBuf::from("res"),
            }
        );

        let (task, _) = parse(&["fixtures", "--out-dir", "elsewhere"])
            .into_task(config)
            .unwrap();
        assert!(matches!(task, Task::Fixtures { results_dir, .. } if results_dir == PathBuf::from("elsewhere")));
    }

    #[test]
    fn test_test_and_export_modes() {
        let (task, _) = parse(&["test"]).into_task(ColorizeConfig::default()).unwrap();
        assert!(matches!(task, Task::Suite { mode: SnapshotMode::Check, .. }));

        let (task, _) = parse(&["test", "--export"])
            .into_task(ColorizeConfig::default())
            .unwrap();
        assert!(matches!(task, Task::Suite { mode: SnapshotMode::Export, .. }));

        let (task, _) = parse(&["export"]).into_task(ColorizeConfig::default()).unwrap();
        assert_eq!(
            task,
            Task::Suite {
                fixtures_dir: PathBuf::from("test/colorize-fixtures"),
                results_dir: PathBuf::from("test/colorize-exports"),
                mode: SnapshotMode::Export,
            }
        );
    }

    #[test]
    fn test_global_overrides_apply_to_config() {
        let (_, config) = parse(&[
            "compare",
            "base.json",
            "a.js",
            "--tokenizer",
            "code-tokens",
            "--tokenizer-arg",
            "--all-themes",
            "--theme",
            "Dark+",
            "--compact",
        ])
        .into_task(ColorizeConfig::default())
        .unwrap();

        assert_eq!(config.tokenizer.program.as_deref(), Some("code-tokens"));
        assert_eq!(config.tokenizer.args, vec!["--all-themes"]);
        assert_eq!(config.themes, vec!["Dark+"]);
        assert_eq!(config.format, OutputFormat::Compact);
    }

    #[test]
    fn test_tokenizer_arg_without_program_is_rejected() {
        let result = parse(&["test", "--tokenizer-arg", "x"]).into_task(ColorizeConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_compare_flags() {
        let (task, _) = parse(&["compare", "base.json", "a.js", "--update", "--json"])
            .into_task(ColorizeConfig::default())
            .unwrap();
        assert_eq!(
            task,
            Task::Compare {
                baseline: PathBuf::from("base.json"),
                source: PathBuf::from("a.js"),
                update: true,
                json: true,
            }
        );
    }
}
