//! The external configuration that applied instructions are written into.

use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use derive_more::Deref;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::fs::write_atomic;

pub type TargetResult<T> = std::result::Result<T, TargetError>;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed settings file {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Settings file {0} does not contain a JSON object")]
    NotAnObject(String),
    #[error("{0}")]
    Rejected(String),
}

/// A configuration with namespaced keys, written at global (user) scope.
pub trait ConfigTarget: Debug + Send + Sync {
    fn get(&self, section: &str, key: &str) -> TargetResult<Option<Value>>;

    /// Overwrite `section.key` with `value`. Never merges with the previous value.
    fn update(&mut self, section: &str, key: &str, value: Value) -> TargetResult<()>;
}

/// Shared handle to the active [`ConfigTarget`].
#[derive(Debug, Clone, Deref)]
pub struct Target {
    #[deref]
    inner: Arc<RwLock<dyn ConfigTarget>>,
}

impl Target {
    pub fn new<T: ConfigTarget + 'static>(target: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(target)),
        }
    }

    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        Self::new(MemoryTarget::default())
    }
}

fn full_key(section: &str, key: &str) -> String {
    if section.is_empty() {
        key.to_string()
    } else {
        format!("{section}.{key}")
    }
}

/// The editor's user `settings.json`, a flat object of dotted keys.
///
/// Keys this crate does not own are left untouched.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> TargetResult<Map<String, Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(TargetError::Io {
                    path: self.path.display().to_string(),
                    source,
                });
            }
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(TargetError::NotAnObject(self.path.display().to_string())),
            Err(source) => Err(TargetError::Decode {
                path: self.path.display().to_string(),
                source,
            }),
        }
    }
}

impl ConfigTarget for SettingsFile {
    fn get(&self, section: &str, key: &str) -> TargetResult<Option<Value>> {
        Ok(self.read()?.remove(&full_key(section, key)))
    }

    fn update(&mut self, section: &str, key: &str, value: Value) -> TargetResult<()> {
        let mut settings = self.read()?;
        settings.insert(full_key(section, key), value);

        let mut contents = serde_json::to_string_pretty(&Value::Object(settings))?;
        contents.push('\n');
        write_atomic(&self.path, contents.as_bytes()).map_err(|source| TargetError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        debug!("Updated {} in {}", full_key(section, key), self.path.display());

        Ok(())
    }
}

/// Keeps settings in memory. Can be told to reject every write.
#[derive(Debug, Default, Clone)]
pub struct MemoryTarget {
    values: BTreeMap<String, Value>,
    reject_with: Option<String>,
}

impl MemoryTarget {
    /// A target whose every write fails with `reason`.
    pub fn rejecting(reason: &str) -> Self {
        Self {
            values: BTreeMap::new(),
            reject_with: Some(reason.to_string()),
        }
    }
}

impl ConfigTarget for MemoryTarget {
    fn get(&self, section: &str, key: &str) -> TargetResult<Option<Value>> {
        Ok(self.values.get(&full_key(section, key)).cloned())
    }

    fn update(&mut self, section: &str, key: &str, value: Value) -> TargetResult<()> {
        if let Some(reason) = &self.reject_with {
            return Err(TargetError::Rejected(reason.clone()));
        }

        self.values.insert(full_key(section, key), value);
        Ok(())
    }
}
