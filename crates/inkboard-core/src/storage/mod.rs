//! Storage abstraction for persisting boards.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::store::ElementStore;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Board not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Backend for named board snapshots.
///
/// Calls are synchronous; the interaction path never touches storage, only
/// explicit save/load requests do.
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Save a board under `name`, replacing any previous version.
    fn save(&self, name: &str, store: &ElementStore) -> StorageResult<()>;

    /// Load a board.
    fn load(&self, name: &str) -> StorageResult<ElementStore>;

    /// Delete a board. Deleting a missing board is not an error.
    fn delete(&self, name: &str) -> StorageResult<()>;

    /// List all board names.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a board exists.
    fn exists(&self, name: &str) -> StorageResult<bool>;
}
