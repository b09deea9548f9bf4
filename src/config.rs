use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::division::DivisionMode;
use crate::question::Operation;
use crate::resolver::RawInputs;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Preferences remembered between runs: the theme and the last setup used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    pub operations: Vec<Operation>,
    pub x_min: String,
    pub x_max: String,
    pub y_min: String,
    pub y_max: String,
    pub allow_decimals: bool,
    pub target_score: String,
    pub duration: String,
    pub division_mode: DivisionMode,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_inputs(Theme::default(), &RawInputs::default())
    }
}

impl Config {
    pub fn from_inputs(theme: Theme, raw: &RawInputs) -> Self {
        Self {
            theme,
            operations: raw.operations.clone(),
            x_min: raw.x_min.clone(),
            x_max: raw.x_max.clone(),
            y_min: raw.y_min.clone(),
            y_max: raw.y_max.clone(),
            allow_decimals: raw.allow_decimals,
            target_score: raw.target_score.clone().unwrap_or_default(),
            duration: raw.duration.clone(),
            division_mode: raw.division_mode,
        }
    }

    pub fn raw_inputs(&self) -> RawInputs {
        RawInputs {
            operations: self.operations.clone(),
            x_min: self.x_min.clone(),
            x_max: self.x_max.clone(),
            y_min: self.y_min.clone(),
            y_max: self.y_max.clone(),
            allow_decimals: self.allow_decimals,
            target_score: Some(self.target_score.clone()).filter(|t| !t.trim().is_empty()),
            duration: self.duration.clone(),
            division_mode: self.division_mode,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("mathdash_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
