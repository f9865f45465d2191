//! Configuration loading for Talent Risk.
//! Reads talentrisk.toml from the current directory or the path in the
//! TALENTRISK_CONFIG env var, then applies environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const CONFIG_ENV: &str = "TALENTRISK_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "talentrisk.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// File the settings were read from; `None` for built-in defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

// ── Server ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds between WebSocket heartbeat frames.
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,
}

fn default_host()           -> String { "0.0.0.0".to_string() }
fn default_port()           -> u16    { 3001 }
fn default_heartbeat_secs() -> u64    { 30 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            heartbeat_secs: default_heartbeat_secs(),
        }
    }
}

// ── Storage ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Mongo,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_mongo_uri")]
    pub uri: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Load the sample roster into an empty in-memory store at startup.
    #[serde(default)]
    pub seed_samples: bool,
}

fn default_mongo_uri()  -> String { "mongodb://localhost:27017".to_string() }
fn default_database()   -> String { "talent-risk".to_string() }
fn default_collection() -> String { "employees".to_string() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            uri: default_mongo_uri(),
            database: default_database(),
            collection: default_collection(),
            seed_samples: false,
        }
    }
}

impl StorageConfig {
    /// The connection string with any password replaced, for logging.
    pub fn redacted_uri(&self) -> String {
        redact_uri(&self.uri)
    }
}

fn redact_uri(uri: &str) -> String {
    let Some(scheme_end) = uri.find("://") else {
        return uri.to_string();
    };
    let rest = &uri[scheme_end + 3..];
    let Some(at) = rest.find('@') else {
        return uri.to_string();
    };
    let credentials = &rest[..at];
    let user = credentials.split(':').next().unwrap_or_default();
    format!("{}://{}:****@{}", &uri[..scheme_end], user, &rest[at + 1..])
}

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Explicit weight vector; when present it replaces the profile's weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightsConfig {
    pub performance: f64,
    pub tenure: f64,
    pub engagement: f64,
    pub compensation: f64,
    pub skills: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default)]
    pub weights: Option<WeightsConfig>,
    #[serde(default = "default_high_threshold")]
    pub high_threshold: f64,
    #[serde(default = "default_medium_threshold")]
    pub medium_threshold: f64,
    /// Number of skill gaps at which the skills factor saturates at 1.0.
    #[serde(default = "default_skill_gap_saturation")]
    pub skill_gap_saturation: f64,
}

fn default_profile()              -> String { "balanced".to_string() }
fn default_high_threshold()       -> f64    { 70.0 }
fn default_medium_threshold()     -> f64    { 40.0 }
fn default_skill_gap_saturation() -> f64    { 3.0 }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            weights: None,
            high_threshold: default_high_threshold(),
            medium_threshold: default_medium_threshold(),
            skill_gap_saturation: default_skill_gap_saturation(),
        }
    }
}

// ── API ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Serve the built-in sample roster when the store is unreachable.
    #[serde(default = "bool_true")]
    pub fallback_to_sample_data: bool,
    #[serde(default = "default_high_threshold")]
    pub default_high_risk_threshold: f64,
    #[serde(default = "default_max_list_limit")]
    pub max_list_limit: usize,
}

fn bool_true()              -> bool  { true }
fn default_max_list_limit() -> usize { 500 }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            fallback_to_sample_data: true,
            default_high_risk_threshold: default_high_threshold(),
            max_list_limit: default_max_list_limit(),
        }
    }
}

// ── Logging ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "info,talentrisk_web=debug,talentrisk_db=debug".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter(), json: false }
    }
}


impl Config {
    /// Load configuration from talentrisk.toml.
    ///
    /// Checks TALENTRISK_CONFIG first, then the current directory. A missing
    /// default file falls back to built-in defaults; a missing file named by
    /// the env var is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var(CONFIG_ENV).ok();
        let path = explicit.clone().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else if explicit.is_some() {
            return Err(ConfigError::NotFound(path));
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Report where the settings came from. Call once a subscriber is set.
    pub fn log_source(&self) {
        match &self.source {
            Some(path) => tracing::info!(path = %path.display(), "configuration loaded"),
            None => tracing::info!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from the environment: MONGODB_URI, MONGODB_DB, PORT,
    /// TALENTRISK_STORAGE.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup("MONGODB_URI") {
            self.storage.uri = uri;
        }
        if let Some(db) = lookup("MONGODB_DB") {
            self.storage.database = db;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(backend) = lookup("TALENTRISK_STORAGE") {
            self.storage.backend = backend.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "TALENTRISK_STORAGE".to_string(),
                value: backend.clone(),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scoring;
        if !(s.medium_threshold > 0.0 && s.medium_threshold < s.high_threshold && s.high_threshold <= 100.0) {
            return Err(ConfigError::Invalid(format!(
                "thresholds must satisfy 0 < medium ({}) < high ({}) <= 100",
                s.medium_threshold, s.high_threshold
            )));
        }
        if !(s.skill_gap_saturation.is_finite() && s.skill_gap_saturation > 0.0) {
            return Err(ConfigError::Invalid("skill_gap_saturation must be positive".to_string()));
        }
        if let Some(w) = &s.weights {
            let all = [w.performance, w.tenure, w.engagement, w.compensation, w.skills];
            if all.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(ConfigError::Invalid("weights must be non-negative".to_string()));
            }
            if all.iter().sum::<f64>() <= 0.0 {
                return Err(ConfigError::Invalid("weights must not all be zero".to_string()));
            }
        }
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".to_string()));
        }
        if self.server.heartbeat_secs == 0 {
            return Err(ConfigError::Invalid("server.heartbeat_secs must be non-zero".to_string()));
        }
        if self.api.max_list_limit == 0 {
            return Err(ConfigError::Invalid("api.max_list_limit must be non-zero".to_string()));
        }
        Ok(())
    }
}
