use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::{HttpConfig, join_endpoint};

pub const ENV_PREFIX: &str = "REVOLT";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_ENDPOINT_PATH: &str = "/api/generateCode";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Config file already exists at {}", .0.display())]
    AlreadyExists(PathBuf),
}

pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .map(|h| h.join("Library/Application Support/revolt"))
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
            .map(|c| c.join("revolt"))
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .map(|a| a.join("revolt"))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .map(|h| h.join(".config/revolt"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Origin of the generation service.
    pub api_base_url: String,
    pub endpoint_path: String,
    pub model: String,
    pub connect_timeout_secs: u64,
    /// Longest silence tolerated between two streamed chunks.
    pub read_timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let http = HttpConfig::default();
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            model: DEFAULT_MODEL.to_string(),
            connect_timeout_secs: http.connect_timeout.as_secs(),
            read_timeout_secs: http.read_timeout.as_secs(),
            max_retries: http.max_retries,
        }
    }
}

impl AppConfig {
    /// Defaults, then the config file, then `REVOLT_*` variables. Falls back
    /// to defaults when anything fails to parse.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(Self::get_config_path().as_deref(), Self::environment()).unwrap_or_else(
            |e| {
                eprintln!("Warning: Failed to load config: {e}");
                tracing::warn!(error = %e, "Falling back to default configuration");
                Self::default()
            },
        )
    }

    pub fn load_from(path: Option<&Path>, env: Environment) -> ConfigResult<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let config = builder.add_source(env).build()?.try_deserialize()?;
        Ok(config)
    }

    #[must_use]
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX).try_parsing(true)
    }

    /// Applies command-line flags on top of the loaded values.
    #[must_use]
    pub fn with_overrides(mut self, model: Option<String>, api_url: Option<String>) -> Self {
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(url) = api_url {
            self.api_base_url = url;
        }
        self
    }

    #[must_use]
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig::new()
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .with_read_timeout(Duration::from_secs(self.read_timeout_secs))
            .with_max_retries(self.max_retries)
    }

    #[must_use]
    pub fn endpoint_url(&self) -> String {
        join_endpoint(&self.api_base_url, &self.endpoint_path)
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        get_config_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn init_default() -> ConfigResult<PathBuf> {
        let path = Self::get_config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::init_at(&path)?;
        Ok(path)
    }

    /// Writes the commented template to `path`, refusing to overwrite.
    pub fn init_at(path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        fs::write(path, include_str!("config.template.toml"))?;
        Ok(())
    }
}
