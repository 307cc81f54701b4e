//! User settings (`Settings.toml`) loading

use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::toml::{TomlDocument, TomlError};

/// Environment variable that overrides the access token from `Settings.toml`
pub const ACCESS_TOKEN_ENV: &str = "BALLERINA_CENTRAL_ACCESS_TOKEN";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: TomlError,
    },
}

/// HTTP proxy configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proxy {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Proxy {
    /// Proxy URL, or `None` when no host is configured
    pub fn url(&self) -> Option<String> {
        if self.host.is_empty() {
            return None;
        }

        let host = if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("http://{}", self.host)
        };

        if self.port == 0 {
            Some(host)
        } else {
            Some(format!("{}:{}", host, self.port))
        }
    }
}

/// Settings read from `Settings.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub proxy: Proxy,
    access_token: Option<String>,
}

impl Settings {
    pub fn new(proxy: Proxy, access_token: Option<String>) -> Self {
        Self {
            proxy,
            access_token,
        }
    }

    /// Parse the content of a `Settings.toml`
    pub fn parse(content: &str) -> Result<Self, TomlError> {
        let doc = TomlDocument::parse(content)?;

        let proxy = Proxy {
            host: doc.get_str("proxy", "host").unwrap_or_default().to_string(),
            port: doc
                .get_int("proxy", "port")
                .and_then(|p| u16::try_from(p).ok())
                .unwrap_or(0),
            username: doc.get_str("proxy", "username").map(String::from),
            password: doc.get_str("proxy", "password").map(String::from),
        };

        Ok(Self {
            proxy,
            access_token: doc.get_str("central", "accesstoken").map(String::from),
        })
    }

    /// Access token for Ballerina Central; the environment variable wins over the file
    pub fn access_token(&self) -> Option<String> {
        access_token_with_env(std::env::var(ACCESS_TOKEN_ENV).ok(), self.access_token.clone())
    }
}

fn access_token_with_env(env_token: Option<String>, file_token: Option<String>) -> Option<String> {
    env_token.filter(|t| !t.is_empty()).or(file_token)
}

/// Source of user settings
#[cfg_attr(test, automock)]
pub trait SettingsSource: Send + Sync {
    fn load(&self) -> Result<Settings, SettingsError>;
}

/// Reads settings from a `Settings.toml` file on every call
pub struct FileSettingsSource {
    path: PathBuf,
}

impl FileSettingsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsSource for FileSettingsSource {
    fn load(&self) -> Result<Settings, SettingsError> {
        if !self.path.exists() {
            debug!("No settings file at {:?}, using defaults", self.path);
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;

        Settings::parse(&content).map_err(|source| SettingsError::Invalid {
            path: self.path.clone(),
            source,
        })
    }
}
