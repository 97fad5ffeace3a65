//! In-memory storage implementation.

use super::{Storage, StorageError, StorageResult};
use crate::store::ElementStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    boards: RwLock<HashMap<String, ElementStore>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", err))
}

impl Storage for MemoryStorage {
    fn save(&self, name: &str, store: &ElementStore) -> StorageResult<()> {
        let mut boards = self.boards.write().map_err(lock_error)?;
        boards.insert(name.to_string(), store.clone());
        Ok(())
    }

    fn load(&self, name: &str) -> StorageResult<ElementStore> {
        let boards = self.boards.read().map_err(lock_error)?;
        boards
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    fn delete(&self, name: &str) -> StorageResult<()> {
        let mut boards = self.boards.write().map_err(lock_error)?;
        boards.remove(name);
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let boards = self.boards.read().map_err(lock_error)?;
        let mut names: Vec<String> = boards.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        let boards = self.boards.read().map_err(lock_error)?;
        Ok(boards.contains_key(name))
    }
}
