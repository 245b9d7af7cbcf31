//! Application configuration management.
//!
//! Handles loading and saving the application configuration, which holds
//! the seed dataset location and the last confirmed selection.
//!
//! Configuration is stored at `~/.config/regioncache/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::SavedSelection;

/// Application name used for config/data directory paths
const APP_NAME: &str = "regioncache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Seed dataset location used when the config does not name one
const DEFAULT_DATASET_PATH: &str = "data/divisions.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub dataset_path: Option<PathBuf>,
    pub last_selection: Option<SavedSelection>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Where the store keeps its list files.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let cache_dir =
            dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// The seed dataset to ingest when the store is empty.
    pub fn dataset_path(&self) -> PathBuf {
        self.dataset_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH))
    }
}
