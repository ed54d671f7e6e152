//! # Configuration
//!
//! Startup settings: record store credentials, the database location and the
//! HTTP bind address.
//!
//! Values come from `EXPENSE_TRACKER_*` environment variables. If
//! `EXPENSE_TRACKER_CONFIG` names a YAML file, it is read first and the
//! environment overrides whatever it sets:
//!
//! ```yaml
//! credentials:
//!   api_key: "..."
//!   project_id: "expense-tracker"
//! database_url: "sqlite:expense_tracker.db"
//! bind_address: "127.0.0.1:3000"
//! ```
//!
//! Missing credentials are reported with a warning, never as an error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const ENV_PREFIX: &str = "EXPENSE_TRACKER_";
pub const DEFAULT_DATABASE_URL: &str = "sqlite:expense_tracker.db";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

/// Database URL that selects the in-process store
pub const MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid bind address '{0}'")]
    InvalidAddress(String),
}

/// Connection credentials for the hosted record store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreCredentials {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
}

/// Layout of the optional YAML config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    credentials: StoreCredentials,
    database_url: Option<String>,
    bind_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub credentials: StoreCredentials,
    pub database_url: String,
    pub bind_address: SocketAddr,
}

impl AppConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to read variables
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, name))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let file = match var("CONFIG") {
            Some(path) => Self::read_file(Path::new(&path))?,
            None => FileConfig::default(),
        };

        let mut credentials = file.credentials;
        let overrides = [
            (&mut credentials.api_key, "API_KEY"),
            (&mut credentials.auth_domain, "AUTH_DOMAIN"),
            (&mut credentials.project_id, "PROJECT_ID"),
            (&mut credentials.storage_bucket, "STORAGE_BUCKET"),
            (&mut credentials.messaging_sender_id, "MESSAGING_SENDER_ID"),
            (&mut credentials.app_id, "APP_ID"),
        ];
        for (slot, name) in overrides {
            if let Some(value) = var(name) {
                *slot = Some(value);
            }
        }

        let database_url = var("DATABASE_URL")
            .or(file.database_url)
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let raw_address = var("ADDR")
            .or(file.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = raw_address
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddress(raw_address.clone()))?;

        Ok(Self {
            credentials,
            database_url,
            bind_address,
        })
    }

    /// Load only from a YAML file, with defaults for anything it leaves out
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let path = path.to_string_lossy().into_owned();
        Self::load_with(|key| {
            if key == format!("{}CONFIG", ENV_PREFIX) {
                Some(path.clone())
            } else {
                None
            }
        })
    }

    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        info!("Reading config file {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Names of required credentials that are not set
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.credentials.api_key.is_none() {
            missing.push("api_key");
        }
        if self.credentials.project_id.is_none() {
            missing.push("project_id");
        }
        missing
    }

    /// Warn about missing credentials. Returns true when none are missing.
    pub fn check_credentials(&self) -> bool {
        let missing = self.missing_credentials();
        if missing.is_empty() {
            return true;
        }

        warn!(
            "Record store credentials missing: {} (set {}API_KEY / {}PROJECT_ID); \
             store access may fail",
            missing.join(", "),
            ENV_PREFIX,
            ENV_PREFIX
        );
        false
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }
}
