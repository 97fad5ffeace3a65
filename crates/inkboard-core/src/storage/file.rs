//! File-based storage: one pretty-printed JSON snapshot per board.

use super::{Storage, StorageError, StorageResult};
use crate::store::ElementStore;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores boards as `<name>.json` files in a directory.
///
/// Names are sanitized into file stems, so distinct names that sanitize to
/// the same stem (`"a b"` and `"a_b"`) share one file. [`Storage::list`]
/// returns the sanitized stems, not the names boards were saved under.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for board files.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Linux: `~/.local/share/inkboard/boards/`
    /// On Windows: `%LOCALAPPDATA%\inkboard\boards\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("inkboard").join("boards"))
    }

    /// File path for a board name. Anything but `[A-Za-z0-9_-]` becomes `_`.
    fn board_path(&self, name: &str) -> PathBuf {
        let safe: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, name: &str, store: &ElementStore) -> StorageResult<()> {
        let path = self.board_path(name);
        let json = store
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        log::debug!("Saved board {} to {}", name, path.display());
        Ok(())
    }

    fn load(&self, name: &str) -> StorageResult<ElementStore> {
        let path = self.board_path(name);
        if !path.exists() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        let json = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

        ElementStore::from_json(&json).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn delete(&self, name: &str) -> StorageResult<()> {
        let path = self.board_path(name);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }

        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        Ok(self.board_path(name).exists())
    }
}
