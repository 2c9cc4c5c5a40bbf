use common::observability::LogFormat;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Default bind address for the issuer HTTP API.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:10000";

/// Default `iss` claim written into every token.
pub const DEFAULT_ISSUER: &str = "wrapups-authserver";

#[derive(Clone)]
pub struct Config {
    pub bind_address: String,
    pub signing_key_path: PathBuf,
    pub credentials_path: PathBuf,
    pub issuer: String,
    /// Generate a key pair at `signing_key_path` when the file is missing.
    pub generate_signing_key: bool,
    pub log_format: LogFormat,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("signing_key_path", &"[REDACTED]")
            .field("credentials_path", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("generate_signing_key", &self.generate_signing_key)
            .field("log_format", &self.log_format)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let signing_key_path = required_path(vars, "AUTH_SIGNING_KEY_PATH")?;
        let credentials_path = required_path(vars, "AUTH_CREDENTIALS_PATH")?;

        let issuer = vars
            .get("AUTH_ISSUER")
            .cloned()
            .unwrap_or_else(|| DEFAULT_ISSUER.to_string());
        if issuer.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "AUTH_ISSUER".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        let generate_signing_key = match vars.get("AUTH_GENERATE_SIGNING_KEY") {
            None => false,
            Some(value) => value.parse::<bool>().map_err(|e| ConfigError::InvalidValue {
                var: "AUTH_GENERATE_SIGNING_KEY".to_string(),
                reason: e.to_string(),
            })?,
        };

        let log_format = match vars.get("LOG_FORMAT") {
            None => LogFormat::default(),
            Some(value) => LogFormat::parse(value).map_err(|e| ConfigError::InvalidValue {
                var: "LOG_FORMAT".to_string(),
                reason: e.to_string(),
            })?,
        };

        Ok(Config {
            bind_address,
            signing_key_path,
            credentials_path,
            issuer,
            generate_signing_key,
            log_format,
        })
    }
}

fn required_path(vars: &HashMap<String, String>, var: &str) -> Result<PathBuf, ConfigError> {
    vars.get(var)
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}
