//! User preferences that survive restarts.
//!
//! The controller only sees the `Preferences` trait; the file-backed store
//! is wired in at startup.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Set once a device scan has succeeded.
pub const AUTO_SCAN_PERMISSION: &str = "auto_scan_permission";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preferences file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("preferences file {path} is not valid TOML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub trait Preferences {
    fn get(&self, key: &str) -> Option<bool>;
    fn set(&mut self, key: &str, value: bool) -> Result<(), PrefsError>;
}

/// Boolean flags kept in a small TOML table.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: BTreeMap<String, bool>,
}

impl FilePreferences {
    /// Read `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).map_err(|source| PrefsError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(PrefsError::Io { path, source }),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), PrefsError> {
        let io_err = |source| PrefsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = toml::to_string(&self.values)?;
        fs::write(&self.path, text).map_err(io_err)
    }
}

impl Preferences for FilePreferences {
    fn get(&self, key: &str) -> Option<bool> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: bool) -> Result<(), PrefsError> {
        if self.values.get(key) == Some(&value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), value);
        self.save()
    }
}

/// Non-persistent store, used when the state directory is unusable.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: BTreeMap<String, bool>,
}

impl Preferences for MemoryPreferences {
    fn get(&self, key: &str) -> Option<bool> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: bool) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_empty_and_set_creates_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("prefs.toml");

        let mut prefs = FilePreferences::open(&path).unwrap();
        assert_eq!(prefs.get(AUTO_SCAN_PERMISSION), None);

        prefs.set(AUTO_SCAN_PERMISSION, true).unwrap();
        assert!(path.is_file());

        let reopened = FilePreferences::open(&path).unwrap();
        assert_eq!(reopened.get(AUTO_SCAN_PERMISSION), Some(true));
    }

    #[test]
    fn unrelated_keys_survive_a_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "other = false\n").unwrap();

        let mut prefs = FilePreferences::open(&path).unwrap();
        prefs.set(AUTO_SCAN_PERMISSION, true).unwrap();

        let reopened = FilePreferences::open(&path).unwrap();
        assert_eq!(reopened.get("other"), Some(false));
        assert_eq!(reopened.get(AUTO_SCAN_PERMISSION), Some(true));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "auto_scan_permission = \"yes\"\n").unwrap();
        assert!(matches!(
            FilePreferences::open(&path),
            Err(PrefsError::Parse { .. })
        ));
    }

    #[test]
    fn memory_store_round_trips() {
        let mut prefs = MemoryPreferences::default();
        assert_eq!(prefs.get(AUTO_SCAN_PERMISSION), None);
        prefs.set(AUTO_SCAN_PERMISSION, true).unwrap();
        assert_eq!(prefs.get(AUTO_SCAN_PERMISSION), Some(true));
    }
}
