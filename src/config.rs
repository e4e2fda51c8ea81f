// Application configuration.
// Loads widget instances and client settings from a YAML file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::github::GITHUB_API_BASE;
use crate::widget::WidgetConfig;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the GitHub REST API.
    pub api_base: String,
    /// Request timeout; the HTTP client default applies when unset.
    pub timeout_secs: Option<u64>,
    /// Directory for cached listings (defaults to the platform cache dir).
    pub cache_dir: Option<PathBuf>,
    pub widgets: BTreeMap<String, WidgetConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: GITHUB_API_BASE.to_string(),
            timeout_secs: None,
            cache_dir: None,
            widgets: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Search order:
    /// 1. Explicit path if provided (must exist)
    /// 2. ./gistlist.yaml
    /// 3. <config dir>/gistlist/config.yaml
    ///
    /// Falls back to defaults when no file is found.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit_path {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            Some(p) => return Err(ConfigError::NotFound(p.display().to_string())),
            None => Self::find_config_file(),
        };

        match path {
            Some(p) => Self::load_from_path(&p),
            None => Ok(Self::default()),
        }
    }

    fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from("gistlist.yaml");
        if local.exists() {
            return Some(local);
        }

        ProjectDirs::from("", "", "gistlist")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
            .filter(|p| p.exists())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn widget(&self, name: &str) -> Result<&WidgetConfig, ConfigError> {
        self.widgets
            .get(name)
            .ok_or_else(|| ConfigError::UnknownWidget(name.to_string()))
    }
}
