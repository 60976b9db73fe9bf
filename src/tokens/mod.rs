//! Token record model
//!
//! A capture is an ordered list of [`TokenRecord`]s, one per classified span
//! of source text, each carrying the grammar scope and the color every
//! evaluated theme renders it with.

mod serialize;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub(crate) use serialize::parse_tokens;
pub use serialize::{deserialize, read_from_file, serialize, write_to_file, OutputFormat};

/// Theme name → rendered color (e.g. `"Dark+": "#569cd6"`)
pub type ThemeColors = BTreeMap<String, String>;

/// Ordered capture of one file, left-to-right, top-to-bottom
pub type TokenSequence = Vec<TokenRecord>;

/// One classified span of source text
///
/// Field order is the serialized key order. The host's raw capture uses the
/// short keys `c`, `t` and `r`, which are accepted when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Exact source text covered by the token
    #[serde(alias = "c")]
    pub content: String,
    /// Grammar scope label, usually dotted (`meta.embedded.block.html`)
    #[serde(alias = "t")]
    pub scope: String,
    /// Per-theme rendered color; empty when no themes were evaluated
    #[serde(rename = "themeColors", alias = "r")]
    pub theme_colors: ThemeColors,
}

impl TokenRecord {
    pub fn new(content: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            scope: scope.into(),
            theme_colors: ThemeColors::new(),
        }
    }

    /// Builder-style helper to attach a theme color
    pub fn with_color(mut self, theme: impl Into<String>, color: impl Into<String>) -> Self {
        self.theme_colors.insert(theme.into(), color.into());
        self
    }

    /// Drop every theme color not named in `themes`
    pub fn retain_themes(&mut self, themes: &[String]) {
        self.theme_colors.retain(|name, _| themes.contains(name));
    }
}

/// Restrict every record of a capture to the given themes
///
/// An empty theme list keeps all colors.
pub fn filter_themes(tokens: &mut [TokenRecord], themes: &[String]) {
    if themes.is_empty() {
        return;
    }
    for token in tokens {
        token.retain_themes(themes);
    }
}

/// Baseline file name for a fixture: first `.` becomes `_`, then `.json`
///
/// `example.js` → `example_js.json`, `a.test.ts` → `a_test.ts.json`
pub fn baseline_file_name(fixture: &Path) -> String {
    let name = fixture
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| fixture.to_string_lossy().into_owned());
    format!("{}.json", name.replacen('.', "_", 1))
}

/// `<results_dir>/<baseline_file_name(fixture)>`
pub fn baseline_path(results_dir: &Path, fixture: &Path) -> PathBuf {
    results_dir.join(baseline_file_name(fixture))
}

/// Total token count across several captures
pub fn total_tokens<'a>(captures: impl IntoIterator<Item = &'a TokenSequence>) -> usize {
    captures.into_iter().map(Vec::len).sum()
}
