//! Client configuration
//!
//! Read from `<config_dir>/web-marker/config.toml`:
//!
//! ```toml
//! backend_url = "https://marks.example.com/api"
//! request_timeout_secs = 20
//! user_agent = "web-marker/0.1"
//! failure_policy = "revert"
//! email = "me@example.com"
//! ```
//!
//! Every key is optional. `WEB_MARKER_BACKEND_URL` overrides `backend_url`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::intent::FailurePolicy;

pub const BACKEND_URL_ENV: &str = "WEB_MARKER_BACKEND_URL";

const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("TOML parse error: {0}")]
    Parse(String),

    #[error("Invalid backend URL {url}: {message}")]
    InvalidBackendUrl { url: String, message: String },

    #[error("Could not build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub backend_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub failure_policy: FailurePolicy,
    /// Account used for automatic sign-in by command-line tools.
    pub email: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("web-marker/{}", env!("CARGO_PKG_VERSION")),
            failure_policy: FailurePolicy::default(),
            email: None,
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load an explicit file. A missing file is an error here.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from the standard location, falling back to defaults when no file
    /// exists, then apply environment overrides.
    pub fn load_standard() -> Result<Self, ConfigError> {
        let config = match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path)?,
            _ => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("web-marker").join("config.toml"))
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_backend_override(std::env::var(BACKEND_URL_ENV).ok())
    }

    /// Replace `backend_url` when `url` is present and non-blank.
    pub fn with_backend_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.backend_url = url.trim().to_string();
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parsed `backend_url`, always ending in `/` so relative joins keep its path.
    pub fn backend_base(&self) -> Result<url::Url, ConfigError> {
        let raw = if self.backend_url.ends_with('/') {
            self.backend_url.clone()
        } else {
            format!("{}/", self.backend_url)
        };
        let parsed = url::Url::parse(&raw).map_err(|e| ConfigError::InvalidBackendUrl {
            url: self.backend_url.clone(),
            message: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::InvalidBackendUrl {
                url: self.backend_url.clone(),
                message: "not a base URL".to_string(),
            });
        }
        Ok(parsed)
    }
}
