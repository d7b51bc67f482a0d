//! Dashboard configuration.

use crate::consts::cli_consts;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

/// Persisted dashboard preferences.
///
/// Every field is optional on disk so that older or hand-written files still load.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Backend to talk to: `local`, `production`, or a base URL.
    pub environment: Option<String>,
    /// Region code selected at startup.
    pub default_region: String,
    /// Seconds between refresh ticks.
    pub refresh_interval_secs: u64,
    /// Maximum number of candidates requested per page.
    pub candidate_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: None,
            default_region: cli_consts::NATIONWIDE_REGION.to_string(),
            refresh_interval_secs: cli_consts::AUTO_REFRESH_INTERVAL_SECS,
            candidate_limit: cli_consts::DEFAULT_CANDIDATE_LIMIT,
        }
    }
}

impl Config {
    /// Create Config pointing at the given region.
    #[allow(unused)]
    pub fn new(default_region: String) -> Self {
        Config {
            default_region,
            ..Default::default()
        }
    }

    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Loads the configuration if the file exists, falling back to defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, std::io::Error> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Removes the configuration file, if present.
    pub fn clear(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Location of the configuration file: `~/.volby/config.json`.
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home_path = home::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Failed to determine home directory",
        )
    })?;
    Ok(home_path.join(".volby").join("config.json"))
}
