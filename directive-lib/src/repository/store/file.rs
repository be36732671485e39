use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    fs::write_atomic,
    repository::store::{KeyValueStore, StoreError, StoreResult},
};

/// On-disk layout of the state file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    sync_keys: Vec<String>,
    #[serde(default)]
    values: toml::Table,
}

/// A [`KeyValueStore`] kept in a single TOML file.
///
/// Every operation reads the file fresh, so two processes sharing the file see each other's
/// writes. A missing file behaves like an empty store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoreResult<StateFile> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                trace!("State file {} does not exist yet", self.path.display());
                return Ok(StateFile::default());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        Ok(toml::from_str(&contents)?)
    }

    fn write(&self, state: &StateFile) -> StoreResult<()> {
        let contents = toml::to_string_pretty(state)?;
        write_atomic(&self.path, contents.as_bytes()).map_err(|source| self.io_error(source))?;

        debug!("Wrote state file {}", self.path.display());

        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<toml::Value>> {
        Ok(self.read()?.values.remove(key))
    }

    fn update(&mut self, key: &str, value: toml::Value) -> StoreResult<()> {
        let mut state = self.read()?;
        state.values.insert(key.to_string(), value);
        self.write(&state)
    }

    fn set_keys_for_sync(&mut self, keys: &[&str]) -> StoreResult<()> {
        let mut state = self.read()?;
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        if state.sync_keys == keys {
            return Ok(());
        }

        state.sync_keys = keys;
        self.write(&state)
    }

    fn keys_for_sync(&self) -> StoreResult<Vec<String>> {
        Ok(self.read()?.sync_keys)
    }
}
