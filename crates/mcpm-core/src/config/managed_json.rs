//! Read-merge-write of host JSON settings documents.
//!
//! mcpm owns exactly one top-level field per document (e.g. `mcpServers`).
//! Everything else in the document is carried through untouched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use serde_json::value::RawValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse JSON config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unexpected shape in {}: {message}", path.display())]
    Shape { path: PathBuf, message: String },
    #[error("Failed to serialize JSON config: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Config file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a removal did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    Missing,
}

/// One value in a settings document.
///
/// Values read from disk stay [`Slot::Raw`] and are written back as the exact
/// text they were parsed from. Only the field mcpm owns is opened up.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Slot {
    Raw(Box<RawValue>),
    Entries(Document),
    Owned(Value),
}

/// Top-level keys of a settings document.
pub type Document = BTreeMap<String, Slot>;

/// Load a JSON object, treating a missing file as an empty document.
pub fn load_document(path: &Path) -> Result<Document, ConfigError> {
    if !path.exists() {
        return Ok(Document::new());
    }
    load_existing_document(path)
}

/// Load a JSON object that must already exist.
pub fn load_existing_document(path: &Path) -> Result<Document, ConfigError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    // An empty file is what some hosts leave behind after a reset.
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::new());
    }
    let parse_error = |source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    };
    let root: &RawValue = serde_json::from_slice(&bytes).map_err(parse_error)?;
    let entries = parse_object(root.get()).ok_or_else(|| ConfigError::Shape {
        path: path.to_path_buf(),
        message: "expected a JSON object at the root".to_string(),
    })?;
    Ok(entries)
}

/// Write a JSON object with two-space indentation, creating parent directories.
pub fn write_document(path: &Path, document: &Document) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let mut bytes = serde_json::to_vec_pretty(document).map_err(ConfigError::Serialize)?;
    bytes.push(b'\n');
    std::fs::write(path, bytes).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace `field.key` with `entry` wholesale and write the document back.
/// Sibling entries under `field` keep their original text.
pub fn upsert_entry_in_field(
    config_path: &Path,
    field: &str,
    key: &str,
    entry: Value,
) -> Result<(), ConfigError> {
    let mut root = load_document(config_path)?;
    let mut entries = take_field(&mut root, config_path, field)?;
    entries.insert(key.to_string(), Slot::Owned(entry));
    root.insert(field.to_string(), Slot::Entries(entries));
    write_document(config_path, &root)
}

/// Delete `field.key`. The document must exist; it is only rewritten when the
/// entry was present.
pub fn remove_entry_in_field(
    config_path: &Path,
    field: &str,
    key: &str,
) -> Result<RemoveOutcome, ConfigError> {
    let mut root = load_existing_document(config_path)?;
    let mut entries = take_field(&mut root, config_path, field)?;
    if entries.remove(key).is_none() {
        return Ok(RemoveOutcome::Missing);
    }
    root.insert(field.to_string(), Slot::Entries(entries));
    write_document(config_path, &root)?;
    Ok(RemoveOutcome::Removed)
}

/// Object text into slots; `None` when the text is not an object.
fn parse_object(text: &str) -> Option<Document> {
    serde_json::from_str::<BTreeMap<String, Box<RawValue>>>(text)
        .ok()
        .map(|entries| {
            entries
                .into_iter()
                .map(|(key, raw)| (key, Slot::Raw(raw)))
                .collect()
        })
}

fn take_field(
    root: &mut Document,
    config_path: &Path,
    field: &str,
) -> Result<Document, ConfigError> {
    let shape_error = || ConfigError::Shape {
        path: config_path.to_path_buf(),
        message: format!("expected '{field}' to be a JSON object"),
    };
    match root.remove(field) {
        None => Ok(Document::new()),
        Some(Slot::Raw(raw)) if raw.get().trim() == "null" => Ok(Document::new()),
        Some(Slot::Raw(raw)) => parse_object(raw.get()).ok_or_else(shape_error),
        Some(Slot::Entries(entries)) => Ok(entries),
        Some(Slot::Owned(Value::Null)) => Ok(Document::new()),
        Some(Slot::Owned(Value::Object(map))) => Ok(map
            .into_iter()
            .map(|(key, value)| (key, Slot::Owned(value)))
            .collect()),
        Some(Slot::Owned(_)) => Err(shape_error()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn upsert_creates_missing_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("settings.json");

        upsert_entry_in_field(&path, "mcpServers", "demo", json!({"command": "x"})).unwrap();

        let written: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written["mcpServers"]["demo"]["command"], "x");
    }

    #[test]
    fn remove_requires_existing_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");

        let err = remove_entry_in_field(&path, "mcpServers", "demo").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn non_object_field_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, r#"{"mcpServers": []}"#).unwrap();

        let err = upsert_entry_in_field(&path, "mcpServers", "demo", json!({})).unwrap_err();
        assert!(matches!(err, ConfigError::Shape { .. }));
    }

    #[test]
    fn unparsable_document_is_left_untouched() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = upsert_entry_in_field(&path, "mcpServers", "demo", json!({})).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn whitespace_only_document_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, "  \n").unwrap();

        assert!(load_document(&path).unwrap().is_empty());
    }

    #[test]
    fn non_object_root_is_a_shape_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let err = upsert_entry_in_field(&path, "mcpServers", "demo", json!({})).unwrap_err();
        assert!(matches!(err, ConfigError::Shape { .. }));
    }

    #[test]
    fn sibling_entries_keep_their_text() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"mcpServers": {"other": {"timeout": 30.50}, "demo": {"command": "old"}}}"#,
        )
        .unwrap();

        upsert_entry_in_field(&path, "mcpServers", "demo", json!({"command": "new"})).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains(r#""other": {"timeout": 30.50}"#), "{text}");
        assert!(text.contains(r#""command": "new""#), "{text}");

        assert_eq!(
            remove_entry_in_field(&path, "mcpServers", "demo").unwrap(),
            RemoveOutcome::Removed
        );
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("30.50"), "{text}");
        assert!(!text.contains("demo"), "{text}");
    }
}
