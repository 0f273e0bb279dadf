//! Configuration handling for Chronica
//!
//! User preferences are stored in TOML at the platform config directory
//! (`~/.config/chronica/config.toml` on Linux). Missing config falls back to
//! defaults; unknown keys are ignored so older builds can read newer files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ZOOM_MAX, ZOOM_MIN};

/// Number of entries kept in the recent-files list.
const RECENT_CAP: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("No config directory available on this platform")]
    NoConfigDir,
}

/// User preferences applied to new documents and the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Zoom applied to freshly created documents
    pub default_zoom: f32,

    /// Year seeded into an empty document's first event
    pub default_year: i32,

    /// Most-recently used document paths, newest first
    pub recent_files: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_zoom: 1.0,
            default_year: crate::domain::SENTINEL_YEAR,
            recent_files: Vec::new(),
        }
    }
}

impl Config {
    /// Returns the platform config file path.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "chronica").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Loads config from the given path, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config: Config =
            toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.default_zoom = config.default_zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        Ok(config)
    }

    /// Writes config to the given path, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let text = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, text)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Records a document path as most recently used.
    pub fn remember_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(RECENT_CAP);
    }
}
