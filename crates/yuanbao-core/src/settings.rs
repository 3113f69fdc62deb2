//! Persisted settings storage
//!
//! Rendering never touches storage; callers load [`crate::ExportOptions`] from a
//! store right before each export.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::error::{ExportError, Result};

/// Key/value persistence for settings
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    /// Persist pending writes (no-op for in-memory stores)
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: Map<String, Value>,
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Default settings file path
pub fn default_settings_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("~"))
        .join(".yuanbao-md")
        .join("settings.json")
}

/// Settings kept as a single JSON object on disk
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileSettings {
    /// Open the store at the default path
    pub fn open_default() -> Result<Self> {
        Self::open(default_settings_path())
    }

    /// Open a settings file; a missing file starts empty
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let values = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<Value>(&raw)? {
                Value::Object(values) => values,
                _ => {
                    return Err(ExportError::InvalidData(format!(
                        "settings file {} is not a JSON object",
                        path.display()
                    )))
                }
            }
        } else {
            Map::new()
        };

        debug!(path = %path.display(), keys = values.len(), "opened settings");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop every stored key
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl SettingsStore for JsonFileSettings {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let pretty = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, pretty)?;
        debug!(path = %self.path.display(), "saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSettings::open(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.get("replaceFormulas"), None);
    }

    #[test]
    fn test_flush_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut store = JsonFileSettings::open(&path).unwrap();
        store.set("headerDowngrade", json!(true)).unwrap();
        store.flush().unwrap();

        let reopened = JsonFileSettings::open(&path).unwrap();
        assert_eq!(reopened.get("headerDowngrade"), Some(json!(true)));
    }

    #[test]
    fn test_rejects_non_object_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let err = JsonFileSettings::open(&path).unwrap_err();
        assert!(matches!(err, ExportError::InvalidData(_)));
    }
}
