//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "notifier.toml",
    "./config/notifier.toml",
    "/etc/power-delay-notifier/config.toml",
];

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "PDN_CONFIG";

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable
    /// overrides, then validate the result.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match self.find_config_file()? {
            Some(path) => {
                info!(?path, "Loading configuration from file");
                AppConfig::from_file(&path)?
            }
            None => AppConfig::default(),
        };

        apply_overrides(&mut config, |key| env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// An explicit path that does not exist is an error; the search paths
    /// are optional.
    fn find_config_file(&self) -> Result<Option<PathBuf>, ConfigError> {
        if let Some(path) = &self.config_path {
            return Self::require(path.clone());
        }

        if let Ok(path) = env::var(CONFIG_PATH_VAR) {
            return Self::require(PathBuf::from(path));
        }

        Ok(CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists()))
    }

    fn require(path: PathBuf) -> Result<Option<PathBuf>, ConfigError> {
        if path.exists() {
            Ok(Some(path))
        } else {
            Err(ConfigError::ValidationError(format!(
                "config file not found: {}",
                path.display()
            )))
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply `PDN_*` overrides read through `lookup`.
///
/// Unparseable numeric values are logged and ignored.
pub(crate) fn apply_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    // Database
    if let Some(val) = lookup("PDN_DATABASE_URL") {
        config.database.url = val;
    }
    parse_into(&lookup, "PDN_DATABASE_MAX_CONNECTIONS", &mut config.database.max_connections);

    // SMTP
    if let Some(val) = lookup("PDN_SMTP_HOST") {
        config.smtp.host = val;
    }
    parse_into(&lookup, "PDN_SMTP_PORT", &mut config.smtp.port);
    if let Some(val) = lookup("PDN_SMTP_USERNAME") {
        config.smtp.username = val;
    }
    if let Some(val) = lookup("PDN_SMTP_PASSWORD") {
        config.smtp.password = val;
    }
    if let Some(val) = lookup("PDN_SMTP_FROM") {
        config.smtp.from_address = val;
    }
    if let Some(val) = lookup("PDN_SMTP_FROM_NAME") {
        config.smtp.from_name = val;
    }
    if let Some(val) = lookup("PDN_SMTP_SECURITY") {
        config.smtp.security = val;
    }
    parse_into(&lookup, "PDN_SMTP_TIMEOUT_SECS", &mut config.smtp.timeout_secs);

    // Dispatch
    parse_into(&lookup, "PDN_SEND_CONCURRENCY", &mut config.dispatch.send_concurrency);
    parse_into(&lookup, "PDN_SEND_TIMEOUT_MS", &mut config.dispatch.send_timeout_ms);
    if let Some(val) = lookup("PDN_AUDIT_FAILURE_POLICY") {
        config.dispatch.audit_failure_policy = val;
    }

    // Validation
    parse_into(&lookup, "PDN_MIN_MESSAGE_LEN", &mut config.validation.min_message_len);
    parse_into(&lookup, "PDN_MAX_MESSAGE_LEN", &mut config.validation.max_message_len);

    // Alert
    if let Some(val) = lookup("PDN_ALERT_ORGANIZATION") {
        config.alert.organization = val;
    }
}

fn parse_into<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(val) = lookup(key) {
        match val.trim().parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(key, value = %val, "Ignoring unparseable environment override"),
        }
    }
}
