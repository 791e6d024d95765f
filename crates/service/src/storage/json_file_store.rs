use std::{collections::HashMap, fs, path::{Path, PathBuf}, sync::{Arc, RwLock}};

use tracing::warn;

use crate::errors::StorageError;
use crate::storage::kv_store::KeyValueStore;

/// JSON file-backed string map.
///
/// Every `set`/`remove` rewrites the file before returning, so the file
/// always mirrors the in-memory map. A corrupt file is treated as empty.
#[derive(Debug)]
pub struct JsonFileStore {
    inner: RwLock<HashMap<String, String>>,
    file_path: PathBuf,
}

impl JsonFileStore {
    /// Open the store at a path. Creates the file with an empty map if missing.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, StorageError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).ok();
            }
        }

        let map: HashMap<String, String> = match fs::read(&file_path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %file_path.display(), error = %e, "session file unreadable; starting empty");
                HashMap::new()
            }),
            Err(_) => {
                let empty: HashMap<String, String> = HashMap::new();
                write_map(&file_path, &empty)?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: RwLock::new(map), file_path }))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Apply a mutation to the map and persist while still holding the lock.
    fn update<F>(&self, f: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut HashMap<String, String>),
    {
        let mut map = self.inner.write().map_err(|_| StorageError::Poisoned)?;
        f(&mut map);
        write_map(&self.file_path, &map)
    }
}

/// Write to a sibling temp file, then rename over the target so readers see
/// either the old map or the new one, never a truncated file.
fn write_map(path: &Path, map: &HashMap<String, String>) -> Result<(), StorageError> {
    let data = serde_json::to_vec(map).map_err(|e| StorageError::Serialization(e.to_string()))?;
    let tmp = temp_sibling(path);
    fs::write(&tmp, data).map_err(StorageError::io)?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        StorageError::io(e)
    })
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.inner.read().map_err(|_| StorageError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|m| {
            m.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|m| {
            m.remove(key);
        })
    }
}
