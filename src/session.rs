use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const SOURCE_KEY: &str = "source";
pub const SLIDE_KEY: &str = "slide";

/// Small persistent key-value store for state that survives restarts
/// (last selected source, last shown slide).
pub struct SessionStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl SessionStore {
    /// Open the store, starting empty if the file is missing or unreadable.
    pub fn open(path: PathBuf) -> Self {
        let values = match Self::load(&path) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring unreadable session file: {e:#}");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn load(path: &Path) -> Result<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set a value and write the store through to disk.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
        if let Err(e) = self.save() {
            tracing::warn!(path = %self.path.display(), "failed to save session: {e:#}");
        }
    }

    /// Write to a temporary file then rename over the real one.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.values)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json).with_context(|| format!("failed to write {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path().join("session.json"));
        assert_eq!(store.get(SOURCE_KEY), None);
    }

    #[test]
    fn set_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut store = SessionStore::open(path.clone());
        store.set(SOURCE_KEY, "/talks/deck.pdf");
        store.set(SLIDE_KEY, "4");

        let reopened = SessionStore::open(path.clone());
        assert_eq!(reopened.get(SOURCE_KEY), Some("/talks/deck.pdf"));
        assert_eq!(reopened.get(SLIDE_KEY), Some("4"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let store = SessionStore::open(path);
        assert_eq!(store.get(SLIDE_KEY), None);
    }
}
