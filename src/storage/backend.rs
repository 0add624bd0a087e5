//! Pluggable persistence backends
//!
//! Repositories keep their working set in memory and hand whole serialized
//! collections to a backend. The backend only stores named text blobs.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{WarikanError, WarikanResult};

use super::file_io::{read_text, write_bytes_atomic};

/// Named-collection store used by the repositories
pub trait StorageBackend: Send + Sync {
    /// Read a collection, or `None` if it was never written
    fn read(&self, collection: &str) -> WarikanResult<Option<String>>;

    /// Replace a collection's contents
    fn write(&self, collection: &str, contents: &str) -> WarikanResult<()>;

    /// Short description for `warikan config`
    fn describe(&self) -> String;
}

/// One pretty-printed JSON file per collection under a data directory
pub struct JsonFileBackend {
    data_dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", collection))
    }
}

impl StorageBackend for JsonFileBackend {
    fn read(&self, collection: &str) -> WarikanResult<Option<String>> {
        read_text(self.collection_path(collection))
    }

    fn write(&self, collection: &str, contents: &str) -> WarikanResult<()> {
        write_bytes_atomic(self.collection_path(collection), contents.as_bytes())
    }

    fn describe(&self) -> String {
        format!("JSON files in {}", self.data_dir.display())
    }
}

/// Process-local backend for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, collection: &str) -> WarikanResult<Option<String>> {
        let collections = self.collections.read().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(collections.get(collection).cloned())
    }

    fn write(&self, collection: &str, contents: &str) -> WarikanResult<()> {
        let mut collections = self.collections.write().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        collections.insert(collection.to_string(), contents.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

/// Deserialize a collection, falling back to its default when absent
pub fn load_collection<T>(backend: &dyn StorageBackend, collection: &str) -> WarikanResult<T>
where
    T: DeserializeOwned + Default,
{
    match backend.read(collection)? {
        Some(text) if !text.trim().is_empty() => serde_json::from_str(&text).map_err(|e| {
            WarikanError::Storage(format!("Failed to parse {}: {}", collection, e))
        }),
        _ => Ok(T::default()),
    }
}

/// Serialize and store a collection
pub fn save_collection<T: Serialize>(
    backend: &dyn StorageBackend,
    collection: &str,
    data: &T,
) -> WarikanResult<()> {
    let contents = serde_json::to_string_pretty(data).map_err(|e| {
        WarikanError::Storage(format!("Failed to serialize {}: {}", collection, e))
    })?;
    backend.write(collection, &contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Names {
        names: Vec<String>,
    }

    #[test]
    fn test_memory_backend_roundtrip() {
        let backend = MemoryBackend::new();
        assert!(backend.read("groups").unwrap().is_none());

        backend.write("groups", "{}").unwrap();
        assert_eq!(backend.read("groups").unwrap().as_deref(), Some("{}"));
        assert_eq!(backend.describe(), "in-memory");
    }

    #[test]
    fn test_json_backend_uses_collection_files() {
        let temp_dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(temp_dir.path().to_path_buf());

        let data = Names {
            names: vec!["Alice".into()],
        };
        save_collection(&backend, "members", &data).unwrap();

        assert!(temp_dir.path().join("members.json").exists());
        let loaded: Names = load_collection(&backend, "members").unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_missing_or_blank_collection_is_default() {
        let backend = MemoryBackend::new();
        let loaded: Names = load_collection(&backend, "members").unwrap();
        assert_eq!(loaded, Names::default());

        backend.write("members", "  \n").unwrap();
        let loaded: Names = load_collection(&backend, "members").unwrap();
        assert_eq!(loaded, Names::default());
    }

    #[test]
    fn test_corrupt_collection_is_storage_error() {
        let backend = MemoryBackend::new();
        backend.write("members", "{oops").unwrap();

        let err = load_collection::<Names>(&backend, "members").unwrap_err();
        assert!(matches!(err, WarikanError::Storage(_)));
        assert!(err.to_string().contains("members"));
    }
}
