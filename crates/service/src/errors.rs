use thiserror::Error;

/// Failures of the durable key-value storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("storage lock poisoned")]
    Poisoned,
}

impl StorageError {
    pub fn io(e: impl std::fmt::Display) -> Self { Self::Io(e.to_string()) }
}
