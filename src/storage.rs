// String-keyed storage backing the workout snapshot

use crate::errors::TrailmarkError;
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Trait defining the key-value operations the workout store persists through
pub trait KeyValueStorage {
    /// Store `value` under `key`, replacing any previous value
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), TrailmarkError>;

    /// Read the value stored under `key`, `None` when absent
    fn get_item(&self, key: &str) -> Result<Option<String>, TrailmarkError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&mut self, key: &str) -> Result<(), TrailmarkError>;
}

/// File-based storage, one JSON file per key
pub struct FileBasedStorage {
    /// Base directory for the stored files
    storage_path: PathBuf,
}

impl FileBasedStorage {
    /// Create a new file-based storage instance
    pub fn new(storage_path: PathBuf) -> Result<Self, TrailmarkError> {
        if !storage_path.exists() {
            fs::create_dir_all(&storage_path)
                .map_err(|e| TrailmarkError::StorageIOError { source: e })?;
        }

        Ok(Self { storage_path })
    }

    /// Create storage in the default application data directory
    pub fn new_default() -> Result<Self, TrailmarkError> {
        let storage_path = Self::default_storage_path()?;
        Self::new(storage_path)
    }

    /// Get the default storage path for workout data
    pub fn default_storage_path() -> Result<PathBuf, TrailmarkError> {
        let app_data_dir = dirs::data_dir().ok_or(TrailmarkError::NoDataDir)?;
        Ok(app_data_dir.join("trailmark"))
    }

    /// Get the storage directory path
    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    fn file_path_for_key(&self, key: &str) -> PathBuf {
        let filename = format!("{}.json", Self::normalize_key(key));
        self.storage_path.join(filename)
    }

    /// Normalize a key for consistent file naming
    fn normalize_key(key: &str) -> String {
        key.to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect()
    }
}

impl KeyValueStorage for FileBasedStorage {
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), TrailmarkError> {
        let file_path = self.file_path_for_key(key);
        let temp_path = file_path.with_extension("json.tmp");

        // Write to a temporary file first so a failed write never truncates the previous snapshot
        {
            let mut temp_file = fs::File::create(&temp_path)
                .map_err(|e| TrailmarkError::StorageIOError { source: e })?;
            temp_file
                .write_all(value.as_bytes())
                .map_err(|e| TrailmarkError::StorageIOError { source: e })?;
            temp_file
                .sync_all()
                .map_err(|e| TrailmarkError::StorageIOError { source: e })?;
        }

        fs::rename(&temp_path, &file_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            TrailmarkError::StorageIOError { source: e }
        })?;

        debug!("Wrote {} bytes to {:?}", value.len(), file_path);
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, TrailmarkError> {
        let file_path = self.file_path_for_key(key);

        if !file_path.exists() {
            debug!("Storage file does not exist: {:?}", file_path);
            return Ok(None);
        }

        let content = fs::read_to_string(&file_path)
            .map_err(|e| TrailmarkError::StorageIOError { source: e })?;
        Ok(Some(content))
    }

    fn remove_item(&mut self, key: &str) -> Result<(), TrailmarkError> {
        let file_path = self.file_path_for_key(key);

        if file_path.exists() {
            fs::remove_file(&file_path)
                .map_err(|e| TrailmarkError::StorageIOError { source: e })?;
        }

        Ok(())
    }
}

/// In-memory storage, lost when dropped
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), TrailmarkError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, TrailmarkError> {
        Ok(self.items.get(key).cloned())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), TrailmarkError> {
        self.items.remove(key);
        Ok(())
    }
}
