use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::TrailmarkError;
use crate::geo::DEFAULT_ZOOM;
use crate::workout::Coordinates;

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Position the map opens at when none is given on the command line
    pub start_position: Option<Coordinates>,
    pub zoom: u8,
    /// Directory holding the workout snapshot, the platform data dir when unset
    pub data_dir: Option<PathBuf>,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            start_position: None,
            zoom: DEFAULT_ZOOM,
            data_dir: None,
            window_width: 1200.,
            window_height: 800.,
        }
    }
}

impl AppConfig {
    pub fn default_config_path() -> Result<PathBuf, TrailmarkError> {
        Ok(dirs::config_dir()
            .ok_or(TrailmarkError::NoConfigDir)?
            .join("trailmark")
            .join(CONFIG_FILE_NAME))
    }

    /// Load the config from the platform config dir. A missing or unreadable file
    /// yields `None`.
    pub fn from_local_file() -> Option<Self> {
        let config_path = Self::default_config_path().ok()?;
        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config file {:?}: {}", config_path, e);
                None
            }
        }
    }

    pub fn load_from(config_path: &Path) -> Result<Option<Self>, TrailmarkError> {
        if !config_path.exists() {
            return Ok(None);
        }

        let file = std::fs::File::open(config_path)
            .map_err(|e| TrailmarkError::ConfigIOError { source: e })?;
        let config = serde_json::from_reader(file)
            .map_err(|e| TrailmarkError::ConfigSerializeError { source: e })?;
        Ok(Some(config))
    }

    pub fn save(&self) -> Result<(), TrailmarkError> {
        self.save_to(&Self::default_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), TrailmarkError> {
        if let Some(parent) = config_path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| TrailmarkError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| TrailmarkError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| TrailmarkError::ConfigSerializeError { source: e })
    }
}
