//! colorsnap - editor colorization snapshots
//!
//! Captures the tokens and per-theme colors a host editor assigns to source
//! files, stores them as JSON baselines, and detects regressions against
//! those baselines with a tolerant comparison.

pub mod capture;
pub mod cli;
pub mod compare;
pub mod config;
pub mod config_paths;
pub mod error;
pub mod snapshot;
pub mod source;
pub mod tokens;
pub mod tracing;

// Re-export commonly used types
pub use capture::{BatchReport, Colorizer};
pub use compare::{compare, ComparisonResult, DiffEntry, DiffKind, DiffValue};
pub use config::ColorizeConfig;
pub use error::{ColorizeError, Result};
pub use snapshot::{SnapshotMode, SnapshotOutcome, SnapshotRunner, SuiteReport};
pub use source::{CommandSource, TokenSource};
pub use tokens::{OutputFormat, TokenRecord, TokenSequence};
