//! Application configuration
//!
//! Loaded from `talks.toml`. Every key is optional; a missing file means
//! defaults throughout.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV: &str = "TALKS_CONFIG";
/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "talks.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the database lives; platform data dir when unset
    pub data_dir: Option<PathBuf>,
    pub log_filter: String,
    pub admin: AdminConfig,
    pub assistant: AssistantConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_filter: "info".to_string(),
            admin: AdminConfig::default(),
            assistant: AssistantConfig::default(),
        }
    }
}

/// Credentials of the seeded administrator account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "adminpassword123".to_string(),
        }
    }
}

/// External text-generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// `"gemini"` or `"offline"`
    pub provider: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Env var consulted when `api_key` is unset
    pub env_var: Option<String>,
    pub base_url: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            provider: "offline".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: None,
            env_var: None,
            base_url: None,
        }
    }
}

impl AppConfig {
    /// Parse a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::from_toml("");
        }
        info!(path = %path.display(), "Loading config");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load from `$TALKS_CONFIG`, else `<config dir>/talks.toml`
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(p) => PathBuf::from(p),
            None => project_dirs()?.config_dir().join("talks.toml"),
        };
        Self::load_from(&path)
    }

    /// Directory holding the database
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(DATABASE_FILE))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("io", "z3r0day", "talks").ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine data directory",
        ))
    })
}
