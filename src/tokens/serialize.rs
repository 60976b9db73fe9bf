//! Canonical JSON form of a token capture
//!
//! Pretty output is indented with tabs, compact output has no whitespace.
//! Writes go through a temp file in the target directory and are renamed into
//! place, so a failed write never leaves a truncated baseline behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tempfile::NamedTempFile;

use super::{TokenRecord, TokenSequence};
use crate::error::{ColorizeError, Result};

/// On-disk layout of a capture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    #[serde(alias = "json")]
    Compact,
}

/// Serialize a capture to JSON text
pub fn serialize(tokens: &[TokenRecord], format: OutputFormat) -> Result<String> {
    let bytes = match format {
        OutputFormat::Pretty => {
            let mut buf = Vec::new();
            let formatter = PrettyFormatter::with_indent(b"\t");
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            tokens
                .serialize(&mut ser)
                .map_err(|e| ColorizeError::format("<serializer>", e.to_string()))?;
            buf
        }
        OutputFormat::Compact => serde_json::to_vec(tokens)
            .map_err(|e| ColorizeError::format("<serializer>", e.to_string()))?,
    };
    String::from_utf8(bytes).map_err(|e| ColorizeError::format("<serializer>", e.to_string()))
}

/// Parse a capture from JSON text
pub fn deserialize(text: &str) -> Result<TokenSequence> {
    parse_tokens(text, "<input>")
}

/// Read and parse a baseline file
pub fn read_from_file(path: &Path) -> Result<TokenSequence> {
    let text = fs::read_to_string(path).map_err(|e| ColorizeError::io(path, e))?;
    parse_tokens(&text, &path.display().to_string())
}

/// Write a capture, creating parent directories and replacing any existing file
pub fn write_to_file(tokens: &[TokenRecord], path: &Path, format: OutputFormat) -> Result<()> {
    let content = serialize(tokens, format)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| ColorizeError::io(dir, e))?;

    let mut tmp = new_temp_file(dir).map_err(|e| ColorizeError::io(dir, e))?;
    // Rewrites keep the mode of the baseline they replace
    if let Some(existing) = fs::metadata(path).ok().filter(|m| m.is_file()) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| ColorizeError::io(tmp.path(), e))?;
    }
    tmp.write_all(content.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| ColorizeError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| ColorizeError::io(path, e.error))?;

    tracing::debug!("Wrote {} tokens to {}", tokens.len(), path.display());
    Ok(())
}

/// Temp file created with the ordinary file mode (0o666 less the umask)
/// instead of the owner-only default
fn new_temp_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".colorsnap-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

pub(crate) fn parse_tokens(text: &str, origin: &str) -> Result<TokenSequence> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ColorizeError::format(origin, e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(ColorizeError::format(
            origin,
            format!("expected a JSON array of tokens, found {}", value_kind(&value)),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<TokenRecord>(item)
                .map_err(|e| ColorizeError::format(origin, format!("token {}: {}", index, e)))
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
