//! Configuration management for foliod.
//!
//! Loads settings from /etc/folio/config.toml, then /var/lib/folio/config.toml,
//! or uses defaults. A few environment variables override the file so container
//! deployments can run without one.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use folio_shared::{years::parse_date, DEFAULT_START_DATE};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/folio/config.toml";

/// Default config file path for fallback
pub const DEFAULT_CONFIG_PATH: &str = "/var/lib/folio/config.toml";

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, host:port
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Allowed CORS origin. Unset allows any origin.
    #[serde(default)]
    pub cors_origin: Option<String>,

    /// Maximum request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_origin: None,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// SQLite storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    "/var/lib/folio/folio.db".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Experience engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceConfig {
    /// Start date used until the `experienceStartDate` setting is stored
    #[serde(default = "default_start_date")]
    pub default_start_date: String,

    /// Record analytics events for experience reads and updates
    #[serde(default = "default_track_analytics")]
    pub track_analytics: bool,
}

fn default_start_date() -> String {
    DEFAULT_START_DATE.to_string()
}

fn default_track_analytics() -> bool {
    true
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            default_start_date: default_start_date(),
            track_analytics: default_track_analytics(),
        }
    }
}

impl ExperienceConfig {
    /// Parsed default start date; a malformed value falls back to the built-in date
    pub fn start_date(&self) -> DateTime<Utc> {
        parse_date(&self.default_start_date).unwrap_or_else(|e| {
            warn!("{}, using {}", e, DEFAULT_START_DATE);
            builtin_start_date()
        })
    }
}

fn builtin_start_date() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_546_300_800, 0).unwrap_or_default()
}

/// Admin access configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Bearer token for admin routes. Unset disables them.
    #[serde(default)]
    pub token: Option<String>,
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub experience: ExperienceConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

impl Config {
    /// Load config from file, or return defaults, then apply environment overrides
    pub fn load() -> Self {
        let mut config = Self::load_from_path(CONFIG_PATH)
            .or_else(|_| Self::load_from_path(DEFAULT_CONFIG_PATH))
            .unwrap_or_else(|e| {
                warn!("Config not found, using defaults: {}", e);
                Config::default()
            });
        config.apply_env();
        config
    }

    /// Load config from specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// FOLIO_BIND, FOLIO_DB_PATH and FOLIO_ADMIN_TOKEN win over the file
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if let Some(bind) = lookup("FOLIO_BIND") {
            info!("FOLIO_BIND set, binding to {}", bind);
            self.server.bind = bind;
        }
        if let Some(path) = lookup("FOLIO_DB_PATH") {
            info!("FOLIO_DB_PATH set, using {}", path);
            self.storage.db_path = path;
        }
        if let Some(token) = lookup("FOLIO_ADMIN_TOKEN") {
            let token = token.trim().to_string();
            self.admin.token = (!token.is_empty()).then_some(token);
        }
    }

    /// Save default config to path (for init)
    pub fn save_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let content = toml::to_string_pretty(&Config::default())?;
        fs::write(path, content)?;
        Ok(())
    }
}
