//! Config file persistence
//!
//! The file holds the pretty printed canonical text of [`AppConfig`] and is
//! read back through the codec's type binder. Loading never fails: a file
//! that cannot be read is moved aside and defaults are used.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use lmeter_types::AppConfig;
use tracing::{error, info, warn};

use super::error::ConfigError;
use crate::codec;

const APP_DIR: &str = "lmeter";
const FILE_NAME: &str = "lmeter.json";

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/lmeter/lmeter.json`, or the working directory when the
    /// platform has no config directory
    pub fn default_location() -> Self {
        let dir = dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir.join(FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Read and decode the file. `Ok(None)` when it does not exist.
    pub fn try_load(&self) -> Result<Option<AppConfig>, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        codec::from_canonical_text(&text)
            .map(Some)
            .map_err(|source| ConfigError::Decode {
                path: self.path.clone(),
                source,
            })
    }

    /// Load the config, falling back to defaults on any failure
    pub fn load(&self) -> AppConfig {
        match self.try_load() {
            Ok(Some(config)) => {
                info!(path = %self.path.display(), meters = config.meters.len(), "Loaded configuration");
                config
            }
            Ok(None) => {
                info!(path = %self.path.display(), "No configuration found, using defaults");
                AppConfig::default()
            }
            Err(e) => {
                error!(error = %e, source = ?std::error::Error::source(&e), "Failed to load configuration, using defaults");
                self.back_up();
                AppConfig::default()
            }
        }
    }

    /// Copy the unreadable file to `<path>.bak`. An existing backup is kept.
    fn back_up(&self) {
        let backup = self.backup_path();
        let result = fs::read(&self.path).and_then(|bytes| {
            OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&backup)?
                .write_all(&bytes)
        });

        match result {
            Ok(()) => info!(backup = %backup.display(), "Backed up unreadable configuration"),
            Err(e) => warn!(backup = %backup.display(), error = %e, "Failed to back up configuration"),
        }
    }

    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let text = codec::to_config_text(config).map_err(ConfigError::Encode)?;

        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        fs::write(&self.path, text).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
