//! Persistence gateway
//!
//! Loads the initial mapping at startup and writes it back in full on STOP.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::Builder;

use crate::error::{KvError, Result};

/// Backing storage for the key-value map
pub trait Persistence: Send + Sync {
    /// Read the whole mapping. Missing storage yields an empty mapping.
    fn load(&self) -> Result<BTreeMap<String, String>>;

    /// Overwrite the backing storage with `entries`
    fn save(&self, entries: &[(String, String)]) -> Result<()>;

    /// Short human-readable name used in responses and logs
    fn location(&self) -> String;
}

/// On-disk document layout
#[derive(Debug, Serialize, Deserialize)]
struct Contents {
    data: Vec<Pair>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Pair {
    key: String,
    value: String,
}

/// Persists the map as a single JSON document
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for JsonFile {
    fn load(&self) -> Result<BTreeMap<String, String>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No data file at {}, starting empty", self.path.display());
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        let contents: Contents = serde_json::from_slice(&bytes).map_err(|e| {
            KvError::Persistence(format!("{} is not a valid data file: {}", self.path.display(), e))
        })?;

        Ok(contents
            .data
            .into_iter()
            .map(|pair| (pair.key, pair.value))
            .collect())
    }

    /// Written to a temporary file beside the target, then renamed over it,
    /// so a crash mid-save leaves the previous file intact
    fn save(&self, entries: &[(String, String)]) -> Result<()> {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(directory)?;

        let contents = Contents {
            data: entries
                .iter()
                .map(|(key, value)| Pair {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        };

        let bytes = serde_json::to_vec(&contents)?;

        let mut file = Builder::new()
            .prefix(&format!(".{}", self.location()))
            .suffix(".tmp")
            .tempfile_in(directory)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!("Saved {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
