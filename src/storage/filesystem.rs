//! JSON file persistence backend.
//!
//! The list is kept in a single file holding a pretty-printed JSON array.
//! Every save rewrites the file in full; there is no journal, so a crash
//! during the write can leave a truncated file behind.

use crate::models::ItemRecord;
use crate::storage::traits::ListStore;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File-backed list store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store for the given file path. The file is not touched.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ListStore for FileStore {
    fn load(&self) -> Result<Vec<ItemRecord>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "List file absent, starting empty");
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&self.path).map_err(|e| Error::OperationFailed {
            operation: "read_list_file".to_string(),
            cause: format!("{}: {e}", self.path.display()),
        })?;

        serde_json::from_str(&json).map_err(|e| Error::OperationFailed {
            operation: "parse_list_file".to_string(),
            cause: format!("{}: {e}", self.path.display()),
        })
    }

    fn save(&self, items: &[ItemRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                operation: "create_list_dir".to_string(),
                cause: e.to_string(),
            })?;
        }

        let json = serde_json::to_string_pretty(items).map_err(|e| Error::OperationFailed {
            operation: "serialize_list".to_string(),
            cause: e.to_string(),
        })?;

        fs::write(&self.path, json).map_err(|e| Error::OperationFailed {
            operation: "write_list_file".to_string(),
            cause: format!("{}: {e}", self.path.display()),
        })
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
