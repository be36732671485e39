use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    document::Headings,
    fs::{config_dir, editor_settings_path, state_dir, write_atomic},
};

const FILE_NAME: &str = "config.toml";
const STATE_FILE_NAME: &str = "state.toml";

/// The core configuration, serialized to TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// One of `debug`, `info`, `warn` or `error`
    pub log_level: String,
    /// Overrides the location of the editor's user settings file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_path: Option<PathBuf>,
    /// Namespace the instructions key lives under
    pub settings_section: String,
    pub instructions_key: String,
    /// Overrides the location of the profile state file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
    /// Labels used for the headings of the profile editing document
    pub headings: Headings,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            settings_path: None,
            settings_section: "github.copilot.chat".into(),
            instructions_key: "codeGeneration.instructions".into(),
            store_path: None,
            headings: Headings::default(),
        }
    }
}

impl CoreConfig {
    /// Default location of the configuration file.
    pub fn path() -> io::Result<PathBuf> {
        Ok(config_dir()?.join(FILE_NAME))
    }

    /// Load the configuration from its default location, creating it if it doesn't exist.
    pub fn load() -> io::Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load the configuration from `path`. A missing file is created with defaults. A file
    /// that can't be parsed is left alone and defaults are used instead.
    pub fn load_from(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            info!("Config file not found, creating default config at {}", path.display());
            let cfg = Self::default();
            cfg.save_to(path)?;
            return Ok(cfg);
        }

        let contents = fs::read_to_string(path)?;
        match toml::from_str(&contents) {
            Ok(cfg) => Ok(cfg),
            Err(err) => {
                warn!("Ignoring malformed config {}: {err}", path.display());
                Ok(Self::default())
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

        write_atomic(path, contents.as_bytes())
    }

    /// Where the profile state lives.
    pub fn store_path(&self) -> io::Result<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => Ok(state_dir()?.join(STATE_FILE_NAME)),
        }
    }

    /// Where applied instructions are written.
    pub fn settings_path(&self) -> io::Result<PathBuf> {
        match &self.settings_path {
            Some(path) => Ok(path.clone()),
            None => editor_settings_path(),
        }
    }

    #[cfg(test)]
    pub(crate) fn mock() -> Self {
        Self::default()
    }
}
