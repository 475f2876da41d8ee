//! 设置存储
//!
//! 持久化的键值设置：`enabled`（布尔）和 `keywords`（有序字符串列表）。
//! 两个键都可能缺失，缺省值由读取方决定。

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};

/// 存储中的设置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

/// 设置存储接口
pub trait SettingsStore {
    fn load(&self) -> FilterResult<StoredSettings>;
    fn save(&self, settings: &StoredSettings) -> FilterResult<()>;

    /// 读取、修改、写回
    fn update<F>(&self, f: F) -> FilterResult<StoredSettings>
    where
        F: FnOnce(&mut StoredSettings),
        Self: Sized,
    {
        let mut settings = self.load()?;
        f(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }
}

/// JSON 文件存储
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> FilterResult<StoredSettings> {
        if !self.path.exists() {
            return Ok(StoredSettings::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            FilterError::StoreError(format!("读取设置失败: {}", e))
                .with_context(self.path.display())
        })?;

        if content.trim().is_empty() {
            return Ok(StoredSettings::default());
        }

        serde_json::from_str(&content).map_err(|e| {
            FilterError::StoreError(format!("解析设置失败: {}", e))
                .with_context(self.path.display())
        })
    }

    fn save(&self, settings: &StoredSettings) -> FilterResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content).map_err(|e| {
            FilterError::StoreError(format!("写入设置失败: {}", e))
                .with_context(self.path.display())
        })
    }
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: RefCell<StoredSettings>,
}

impl MemoryStore {
    pub fn new(settings: StoredSettings) -> Self {
        Self {
            settings: RefCell::new(settings),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> FilterResult<StoredSettings> {
        Ok(self.settings.borrow().clone())
    }

    fn save(&self, settings: &StoredSettings) -> FilterResult<()> {
        *self.settings.borrow_mut() = settings.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_empty_settings() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load().unwrap(), StoredSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/settings.json"));

        let settings = StoredSettings {
            enabled: Some(false),
            keywords: Some(vec!["hiring".to_string(), "open role".to_string()]),
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn test_corrupt_file_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, FilterError::StoreError(_)));
    }

    #[test]
    fn test_missing_keys_stay_absent() {
        let settings: StoredSettings = serde_json::from_str(r#"{"enabled":true}"#).unwrap();
        assert_eq!(settings.keywords, None);
        assert_eq!(serde_json::to_string(&settings).unwrap(), r#"{"enabled":true}"#);
    }

    #[test]
    fn test_memory_store_update() {
        let store = MemoryStore::default();
        let updated = store.update(|s| s.enabled = Some(false)).unwrap();
        assert_eq!(updated.enabled, Some(false));
        assert_eq!(store.load().unwrap().enabled, Some(false));
    }
}
