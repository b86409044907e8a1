use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::analyzer::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::analyzer::OutgoingMime;
use crate::scene::ArrowheadMode;
use crate::shell::intake::UploadPolicy;

const CONFIG_FILE: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("No configuration directory available on this platform")]
    NoConfigDir,

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
    pub outgoing_mime: OutgoingMime,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 60,
            outgoing_mime: OutgoingMime::default(),
        }
    }
}

impl AnalyzerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub accepted_types: Vec<String>,
    pub max_size_mb: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        let policy = UploadPolicy::default();
        Self {
            accepted_types: policy.accepted_types,
            max_size_mb: policy.max_size_mb,
        }
    }
}

impl UploadSettings {
    pub fn policy(&self) -> UploadPolicy {
        UploadPolicy {
            accepted_types: self.accepted_types.clone(),
            max_size_mb: self.max_size_mb,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub arrowhead: ArrowheadMode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub analyzer: AnalyzerSettings,
    pub upload: UploadSettings,
    pub scene: SceneSettings,
}

impl AppSettings {
    pub fn from_toml_str(data: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(data)?)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let data = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&data)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, self.to_toml_string()?).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "diagram3d", "diagram3d")
        .map(|proj| proj.config_dir().join(CONFIG_FILE))
}

/// Load settings from the platform config directory, falling back to defaults
pub fn load_settings() -> AppSettings {
    let Some(path) = config_path() else {
        warn!("No configuration directory, using default settings");
        return AppSettings::default();
    };

    if !path.exists() {
        debug!("No settings at {}, using defaults", path.display());
        return AppSettings::default();
    }

    match AppSettings::load_from(&path) {
        Ok(settings) => {
            debug!("Loaded settings from {}", path.display());
            settings
        }
        Err(e) => {
            warn!("Ignoring settings file: {}", e);
            AppSettings::default()
        }
    }
}
