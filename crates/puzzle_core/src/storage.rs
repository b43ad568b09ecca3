//! Key-value persistence port.
//!
//! The engine persists whole JSON records under fixed keys. `MemoryStore`
//! backs tests and embedders that own persistence themselves; `FileStore`
//! writes one file per key with an atomic temp-file + rename.

use crate::error::{GameError, GameResult};
use std::collections::HashMap;
use std::fs::{self, rename, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub trait KeyValueStore {
    fn load(&self, key: &str) -> GameResult<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> GameResult<()>;
    fn remove(&mut self, key: &str) -> GameResult<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }

    /// Make every subsequent write fail with [`GameError::Storage`].
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> GameResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> GameResult<()> {
        if self.fail_writes {
            return Err(GameError::Storage(format!("write to '{}' rejected", key)));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> GameResult<()> {
        if self.fail_writes {
            return Err(GameError::Storage(format!("remove of '{}' rejected", key)));
        }
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> GameResult<PathBuf> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(GameError::Storage(format!("invalid storage key '{}'", key)));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> GameResult<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(Some(data))
    }

    fn save(&mut self, key: &str, value: &str) -> GameResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        // Write to a temp file, then rename over the target
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(value.as_bytes())?;
            file.flush()?;
            file.sync_all()?;
        }
        rename(&temp_path, &path)?;

        log::debug!("Saved {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> GameResult<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(&path)?;
            log::info!("Removed {:?}", path);
        }
        Ok(())
    }
}
