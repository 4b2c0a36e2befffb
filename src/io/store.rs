use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use crate::migrate::migrate;
use crate::model::document::Document;

/// Error type for store writes. Loading never errors — corrupt or missing
/// data degrades to the default document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Owns the persisted document file. All reads and writes of application
/// state pass through here; nothing else touches the file.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Store { path: path.into() }
    }

    /// Default store location, respecting XDG_DATA_HOME
    pub fn default_path() -> PathBuf {
        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs_home().join(".local").join("share"));
        data_dir.join("taskdeck").join("tasks.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and normalize the persisted document. A missing, unreadable, or
    /// malformed file yields the default document.
    pub fn load(&self, now: DateTime<Utc>) -> Document {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return Document::new_default(now);
        };
        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(raw) => migrate(raw, now),
            Err(_) => Document::new_default(now),
        }
    }

    /// Serialize the whole document and atomically replace the file.
    pub fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(doc)?;
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(|e| StoreError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        }
        atomic_write(&self.path, content.as_bytes()).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Delete the persisted file and return a fresh default document.
    pub fn reset(&self, now: DateTime<Utc>) -> Result<Document, StoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| StoreError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        }
        Ok(Document::new_default(now))
    }
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Write via a temp file in the same directory, then rename into place.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
