use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use colorsnap::capture::{discover_fixtures, BatchReport};
use colorsnap::cli::{CliArgs, Task};
use colorsnap::compare::render_report;
use colorsnap::snapshot::{SnapshotMode, SnapshotOutcome, SuiteReport};
use colorsnap::tokens;
use colorsnap::{compare, ColorizeConfig, Colorizer, CommandSource, SnapshotRunner};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    colorsnap::tracing::init(args.verbose);

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Colorization failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Execute the requested task; `Ok(false)` means the task ran but found problems
fn run(args: CliArgs) -> Result<bool> {
    let config = ColorizeConfig::load(args.config.as_deref()).map_err(anyhow::Error::msg)?;
    let (task, config) = args.into_task(config).map_err(anyhow::Error::msg)?;

    if task == Task::ShowConfig {
        print!("{}", config.to_yaml().map_err(anyhow::Error::msg)?);
        return Ok(true);
    }

    let source = CommandSource::from_config(&config.tokenizer).context(
        "No tokenizer configured: set `tokenizer.program` in the config or pass --tokenizer",
    )?;
    tracing::debug!("Using tokenizer {}", source.program());

    let colorizer = Colorizer::new(&source)
        .with_format(config.format)
        .with_themes(config.themes.clone());

    match task {
        Task::Colorize { file, output } => {
            let tokens = colorizer
                .capture_to_file(&file, &output)
                .with_context(|| format!("Failed to colorize {}", file.display()))?;
            println!(
                "Colorization complete! {} tokens saved to {}",
                tokens.len(),
                output.display()
            );
            Ok(true)
        }
        Task::Batch { files, out_dir } => {
            let report = colorizer
                .capture_many(&files, Some(&out_dir))
                .context("Failed to colorize files")?;
            print_batch(&report, "files");
            Ok(report.is_complete())
        }
        Task::Fixtures {
            fixtures_dir,
            results_dir,
        } => {
            let report = colorizer
                .capture_fixtures(&fixtures_dir, &results_dir, &config.fixture_extensions)
                .context("Failed to colorize fixtures")?;
            print_batch(&report, "fixture files");
            Ok(report.is_complete())
        }
        Task::Compare {
            baseline,
            source,
            update,
            json,
        } => compare_with_baseline(&colorizer, &baseline, &source, update, json),
        Task::Suite {
            fixtures_dir,
            results_dir,
            mode,
        } => {
            let fixtures = discover_fixtures(&fixtures_dir, &config.fixture_extensions)?;
            if mode == SnapshotMode::Export {
                tracing::info!("Exporting colorization for {} fixtures...", fixtures.len());
            }
            let runner = SnapshotRunner::new(colorizer, results_dir);
            let report = runner.run_suite(&fixtures, mode);
            print_suite(&report, mode);
            Ok(report.is_success())
        }
        Task::ShowConfig => Ok(true),
    }
}

fn compare_with_baseline(
    colorizer: &Colorizer<'_>,
    baseline_path: &Path,
    source: &Path,
    update: bool,
    json: bool,
) -> Result<bool> {
    let baseline = tokens::read_from_file(baseline_path)
        .with_context(|| format!("Failed to load baseline {}", baseline_path.display()))?;
    let current = colorizer
        .capture(source)
        .with_context(|| format!("Failed to colorize {}", source.display()))?;

    let comparison = compare(&baseline, &current);

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else if comparison.identical {
        println!("Colorization matches baseline!");
    } else {
        println!(
            "Found {} differences in colorization\n",
            comparison.diffs.len()
        );
        print!("{}", render_report(&comparison));
    }

    if update && !comparison.identical {
        tokens::write_to_file(&current, baseline_path, colorizer.format())?;
        println!("Updated baseline {}", baseline_path.display());
    }

    Ok(comparison.identical)
}

fn print_batch(report: &BatchReport, noun: &str) {
    println!(
        "Colorized {} {} with {} total tokens",
        report.file_count(),
        noun,
        report.token_count()
    );
    for failure in &report.failures {
        println!("  failed: {}: {}", failure.path.display(), failure.error);
    }
}

fn print_suite(report: &SuiteReport, mode: SnapshotMode) {
    for fixture in &report.fixtures {
        match &fixture.result {
            Ok(outcome) => {
                println!("{:<20} {}", outcome.label(), fixture.fixture.display());
                if let SnapshotOutcome::UpdatedFail(comparison) = outcome {
                    println!("{}", render_report(comparison));
                }
            }
            Err(e) => println!("{:<20} {}: {}", "ERROR", fixture.fixture.display(), e),
        }
    }

    match mode {
        SnapshotMode::Export => println!(
            "Successfully exported {} colorization files ({} failed)",
            report.passed(),
            report.failed()
        ),
        SnapshotMode::Check => println!("{} passed, {} failed", report.passed(), report.failed()),
    }
}
