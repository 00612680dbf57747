//! Power Delay Notifier Configuration
//!
//! TOML-based configuration with `PDN_*` environment variable overrides.
//! Every section is `#[serde(default)]`, so a partial file only has to name
//! the keys it changes.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub smtp: SmtpSettings,
    pub dispatch: DispatchSettings,
    pub validation: ValidationSettings,
    pub alert: AlertSettings,
}

/// PostgreSQL connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/power_delay_notifier".to_string(),
            max_connections: 10,
        }
    }
}

/// Outgoing mail server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Envelope sender; falls back to `username` when empty
    pub from_address: String,
    pub from_name: String,
    /// starttls, tls or none
    pub security: String,
    pub timeout_secs: u64,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from_address: String::new(),
            from_name: "Power Delay Notifier".to_string(),
            security: "starttls".to_string(),
            timeout_secs: 30,
        }
    }
}

impl SmtpSettings {
    /// Address placed in the `From` header.
    pub fn sender_address(&self) -> &str {
        if self.from_address.trim().is_empty() {
            &self.username
        } else {
            &self.from_address
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Largest accepted `dispatch.send_concurrency`
pub const MAX_SEND_CONCURRENCY: usize = 1024;

/// Fan-out behaviour of a single dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Concurrent sends per area (1 = sequential)
    pub send_concurrency: usize,
    /// Upper bound on a single send in milliseconds
    pub send_timeout_ms: u64,
    /// fail_area or decoupled
    pub audit_failure_policy: String,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            send_concurrency: 1,
            send_timeout_ms: 30_000,
            audit_failure_policy: "fail_area".to_string(),
        }
    }
}

impl DispatchSettings {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

/// Request validation limits, in characters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    pub min_area_len: usize,
    pub max_area_len: usize,
    pub min_message_len: usize,
    pub max_message_len: usize,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            min_area_len: 2,
            max_area_len: 100,
            min_message_len: 10,
            max_message_len: 1000,
        }
    }
}

/// Alert email presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    /// Shown next to the sender name, e.g. "Technician, KPTCL"
    pub organization: String,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            organization: "KPTCL".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Reject values the platform cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.database.max_connections == 0 {
            problems.push("database.max_connections must be at least 1".to_string());
        }
        if self.smtp.port == 0 {
            problems.push("smtp.port must be non-zero".to_string());
        }
        if !matches!(
            self.smtp.security.to_ascii_lowercase().as_str(),
            "starttls" | "tls" | "none"
        ) {
            problems.push(format!(
                "smtp.security must be starttls, tls or none (got '{}')",
                self.smtp.security
            ));
        }
        if self.dispatch.send_concurrency == 0 {
            problems.push("dispatch.send_concurrency must be at least 1".to_string());
        } else if self.dispatch.send_concurrency > MAX_SEND_CONCURRENCY {
            problems.push(format!(
                "dispatch.send_concurrency must be at most {} (got {})",
                MAX_SEND_CONCURRENCY, self.dispatch.send_concurrency
            ));
        }
        if self.dispatch.send_timeout_ms == 0 {
            problems.push("dispatch.send_timeout_ms must be non-zero".to_string());
        }
        if !matches!(
            self.dispatch.audit_failure_policy.to_ascii_lowercase().as_str(),
            "fail_area" | "decoupled"
        ) {
            problems.push(format!(
                "dispatch.audit_failure_policy must be fail_area or decoupled (got '{}')",
                self.dispatch.audit_failure_policy
            ));
        }
        if self.validation.min_area_len > self.validation.max_area_len {
            problems.push("validation.min_area_len exceeds max_area_len".to_string());
        }
        if self.validation.min_message_len > self.validation.max_message_len {
            problems.push("validation.min_message_len exceeds max_message_len".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ValidationError(problems.join("; ")))
        }
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# Power Delay Notifier Configuration
# PDN_* environment variables override these settings

[database]
url = "postgres://localhost:5432/power_delay_notifier"
max_connections = 10

[smtp]
host = "smtp.gmail.com"
port = 587
username = ""
password = ""
from_address = ""  # defaults to username
from_name = "Power Delay Notifier"
security = "starttls"  # starttls, tls, none
timeout_secs = 30

[dispatch]
send_concurrency = 1
send_timeout_ms = 30000
audit_failure_policy = "fail_area"  # fail_area, decoupled

[validation]
min_area_len = 2
max_area_len = 100
min_message_len = 10
max_message_len = 1000

[alert]
organization = "KPTCL"
"#
        .to_string()
    }
}
