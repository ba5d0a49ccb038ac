//! Persistence of the deck snapshot as an opaque JSON blob.
//!
//! The engine owns the schema; a store only reads and writes the text.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config;
use crate::error::Result;

/// Logical key-value contract for the persisted deck snapshot.
pub trait DeckStore {
    /// Return the stored blob, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored blob.
    fn save(&mut self, blob: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FileDeckStore
// ---------------------------------------------------------------------------

/// Stores the snapshot as a single JSON file inside a data directory.
#[derive(Debug)]
pub struct FileDeckStore {
    /// Directory holding the snapshot file.
    pub data_dir: PathBuf,
    path: PathBuf,
}

impl FileDeckStore {
    /// Create a store rooted at `data_dir`.
    ///
    /// If `data_dir` is `None`, uses the platform-appropriate data directory.
    /// Creates the directory if it does not exist.
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let dir = data_dir.unwrap_or_else(config::default_data_dir);
        fs::create_dir_all(&dir)?;
        let path = dir.join(config::STORE_FILE);
        Ok(Self {
            data_dir: dir,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeckStore for FileDeckStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a temp file first and renames on success, so an interrupted
    /// write never leaves a truncated snapshot behind.
    fn save(&mut self, blob: &str) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.data_dir)?;
        tmp.write_all(blob.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryDeckStore
// ---------------------------------------------------------------------------

/// In-process store, for tests and embedders that persist elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MemoryDeckStore {
    blob: Option<String>,
    saves: usize,
    fail_saves: bool,
}

impl MemoryDeckStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `blob`.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
            ..Self::default()
        }
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }

    /// Make every subsequent save fail with an IO error.
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }
}

impl DeckStore for MemoryDeckStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.blob.clone())
    }

    fn save(&mut self, blob: &str) -> Result<()> {
        if self.fail_saves {
            return Err(io::Error::new(io::ErrorKind::Other, "store is read-only").into());
        }
        self.blob = Some(blob.to_string());
        self.saves += 1;
        Ok(())
    }
}
