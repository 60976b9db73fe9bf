//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use colorsnap::{ColorizeError, TokenRecord, TokenSequence, TokenSource};
use tempfile::TempDir;

/// Deterministic stand-in for the editor tokenizer
///
/// Tokens are keyed by fixture file name and can be swapped between runs to
/// simulate an editor or theme update.
#[derive(Default)]
pub struct FakeSource {
    tokens: Mutex<HashMap<String, TokenSequence>>,
    failing: Mutex<HashSet<String>>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, file_name: &str, tokens: TokenSequence) {
        self.tokens
            .lock()
            .unwrap()
            .insert(file_name.to_string(), tokens);
    }

    pub fn fail(&self, file_name: &str) {
        self.failing.lock().unwrap().insert(file_name.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenSource for FakeSource {
    fn capture_tokens(&self, path: &Path) -> colorsnap::Result<TokenSequence> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.failing.lock().unwrap().contains(&name) {
            return Err(ColorizeError::capture(path, "tokenizer service unavailable"));
        }

        Ok(self
            .tokens
            .lock()
            .unwrap()
            .get(&name)
            .cloned()
            .unwrap_or_default())
    }
}

/// In-memory log sink for asserting on `tracing` output
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with logs captured on the current thread; returns its result and the log text
pub fn with_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}

/// Build a record from content, scope and `(theme, color)` pairs
pub fn tok(content: &str, scope: &str, colors: &[(&str, &str)]) -> TokenRecord {
    colors
        .iter()
        .fold(TokenRecord::new(content, scope), |record, (theme, color)| {
            record.with_color(*theme, *color)
        })
}

/// Tokens roughly as the editor reports `html\`<div>\``
pub fn tagged_template_tokens() -> TokenSequence {
    vec![
        tok(
            "html",
            "source.js entity.name.function.tagged-template.js",
            &[("Dark+", "#dcdcaa"), ("Light+", "#795e26")],
        ),
        tok(
            "`",
            "source.js string.js punctuation.definition.string.template.begin.js",
            &[("Dark+", "#ce9178"), ("Light+", "#a31515")],
        ),
        tok(
            "<",
            "source.js meta.embedded.block.html punctuation.definition.tag.begin.html",
            &[("Dark+", "#808080"), ("Light+", "#800000")],
        ),
        tok(
            "div",
            "source.js meta.embedded.block.html entity.name.tag.html",
            &[("Dark+", "#569cd6"), ("Light+", "#800000")],
        ),
        tok(
            ">",
            "source.js meta.embedded.block.html punctuation.definition.tag.end.html",
            &[("Dark+", "#808080"), ("Light+", "#800000")],
        ),
        tok(
            "`",
            "source.js string.js punctuation.definition.string.template.end.js",
            &[("Dark+", "#ce9178"), ("Light+", "#a31515")],
        ),
    ]
}

/// Temp workspace with a fixtures dir containing the given files
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn with_fixtures(names: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("colorize-fixtures")).unwrap();
        for name in names {
            std::fs::write(
                dir.path().join("colorize-fixtures").join(name),
                "const t = html`<div></div>`;\n",
            )
            .unwrap();
        }
        Self { dir }
    }

    pub fn fixtures_dir(&self) -> PathBuf {
        self.dir.path().join("colorize-fixtures")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.dir.path().join("colorize-results")
    }

    pub fn fixture(&self, name: &str) -> PathBuf {
        self.fixtures_dir().join(name)
    }
}
