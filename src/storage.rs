//! Storage layer for todo lists
//!
//! Every list is one pretty-printed JSON array on disk:
//!
//! ```text
//! data/                      # data_dir (TODO_DATA_DIR)
//!   todos.json               # one file per list id
//!   todos.json.lock          # advisory lock taken around writes
//!   arbeit.json
//! ```
//!
//! A deployment may keep the default list at a single legacy path instead
//! (`legacy_file` in the config).
//!
//! Reads never fail: a missing, unreadable or malformed file is an empty
//! list. Writes always replace the whole file and propagate their errors.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::Result;
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};
use crate::todo::Todo;

/// Maps list ids to their backing files
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
    legacy_file: Option<PathBuf>,
    default_list: String,
}

impl Storage {
    pub fn new(data_dir: PathBuf, default_list: impl Into<String>) -> Self {
        Self {
            data_dir,
            legacy_file: None,
            default_list: default_list.into(),
        }
    }

    /// Keep the default list at `path` instead of `<data_dir>/<id>.json`
    pub fn with_legacy_file(mut self, path: Option<PathBuf>) -> Self {
        self.legacy_file = path;
        self
    }

    /// Path to the file backing `list_id`
    pub fn list_file(&self, list_id: &str) -> PathBuf {
        match &self.legacy_file {
            Some(legacy) if list_id == self.default_list => legacy.clone(),
            _ => self.data_dir.join(format!("{list_id}.json")),
        }
    }
}

/// Read the raw records of a list file
///
/// Missing files, read errors, invalid JSON and non-array documents all
/// come back as an empty list.
pub fn load(path: &Path) -> Vec<Value> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "list file missing, starting empty");
            return Vec::new();
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "unreadable list file, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(records)) => {
            tracing::debug!(path = %path.display(), records = records.len(), "loaded list file");
            records
        }
        Ok(_) => {
            tracing::warn!(path = %path.display(), "list file is not a JSON array, starting empty");
            Vec::new()
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "corrupt list file, starting empty");
            Vec::new()
        }
    }
}

/// Replace the list file with `todos`
///
/// Pretty-printed, non-ASCII kept literal, parent directories created.
pub fn save(path: &Path, todos: &[Todo]) -> Result<()> {
    let json = serde_json::to_string_pretty(todos)?;
    lock::write_atomic_locked(path, json.as_bytes(), DEFAULT_LOCK_TIMEOUT_MS)?;
    tracing::debug!(path = %path.display(), todos = todos.len(), "saved list file");
    Ok(())
}

/// Delete the list file if present
pub fn remove(path: &Path) -> Result<()> {
    if lock::remove_locked(path, DEFAULT_LOCK_TIMEOUT_MS)? {
        tracing::debug!(path = %path.display(), "removed list file");
    }
    Ok(())
}
