use crate::errors::StorageError;

/// Synchronous string key-value storage.
/// Implementations can be in-memory, file-backed, or a platform store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
