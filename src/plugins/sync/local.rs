//! On-disk mirror of the remote store: one JSON file per key.

use crate::shared::errors::StorageError;
use crate::shared::paths::ensure_dir;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct LocalCache {
    dir: PathBuf,
}

/// Maps a key to a file-safe name. Anything outside `[A-Za-z0-9_-]` is
/// written as `%XX`, so distinct keys never share a file.
fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", escape_key(key)))
    }

    /// Missing entries and unparsable files both read as `None`.
    pub fn get(&self, key: &str) -> Option<Value> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(target: "sync", key, error = %e, "Failed to read local copy");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(target: "sync", key, error = %e, "Discarding corrupt local copy");
                None
            }
        }
    }

    pub fn put(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        ensure_dir(&self.dir)
            .map_err(|e| StorageError::directory(format!("{}: {}", self.dir.display(), e)))?;
        let content = serde_json::to_string(value)?;
        fs::write(self.path_for(key), content)?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
