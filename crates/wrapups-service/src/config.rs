//! Wrapups service configuration.
//!
//! Loaded from environment variables at startup. The token validation
//! strategy is chosen here with `AUTH_MODE`.

use common::jwt::{ClaimExpectations, CodecError, VerifyingKey};
use common::observability::LogFormat;
use common::validator::{DelegatedValidator, LocalValidator, TokenValidator};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Default bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:10001";

/// Default `aud` this service accepts.
pub const DEFAULT_EXPECTED_AUDIENCE: &str = "wrapups";

/// Default delegated validation timeout in milliseconds.
pub const DEFAULT_VALIDATION_TIMEOUT_MS: u64 = 5000;

/// How incoming tokens are validated.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// Verify in-process with the issuer's public key.
    Local { public_key_path: PathBuf },
    /// Ask the issuer over HTTP.
    Delegated { validate_url: String },
}

impl fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Local { .. } => f
                .debug_struct("Local")
                .field("public_key_path", &"[REDACTED]")
                .finish(),
            AuthMode::Delegated { validate_url } => f
                .debug_struct("Delegated")
                .field("validate_url", validate_url)
                .finish(),
        }
    }
}

/// Wrapups service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub auth_mode: AuthMode,
    pub expected_audience: String,
    pub expected_issuer: Option<String>,
    pub validation_timeout: Duration,
    pub log_format: LogFormat,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    #[error("Failed to load verification key: {0}")]
    KeyLoad(#[from] CodecError),

    #[error("Failed to build validation client: {0}")]
    HttpClient(String),
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or invalid.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let auth_mode = match vars.get("AUTH_MODE").map(|m| m.to_ascii_lowercase()).as_deref() {
            None | Some("local") => AuthMode::Local {
                public_key_path: vars
                    .get("AUTH_PUBLIC_KEY_PATH")
                    .filter(|p| !p.trim().is_empty())
                    .map(PathBuf::from)
                    .ok_or_else(|| ConfigError::MissingEnvVar("AUTH_PUBLIC_KEY_PATH".to_string()))?,
            },
            Some("delegated") => AuthMode::Delegated {
                validate_url: vars
                    .get("AUTH_VALIDATE_URL")
                    .filter(|u| !u.trim().is_empty())
                    .cloned()
                    .ok_or_else(|| ConfigError::MissingEnvVar("AUTH_VALIDATE_URL".to_string()))?,
            },
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    var: "AUTH_MODE".to_string(),
                    reason: format!("'{other}' is not one of: local, delegated"),
                })
            }
        };

        let expected_audience = vars
            .get("AUTH_EXPECTED_AUDIENCE")
            .cloned()
            .unwrap_or_else(|| DEFAULT_EXPECTED_AUDIENCE.to_string());

        let expected_issuer = vars
            .get("AUTH_EXPECTED_ISSUER")
            .filter(|i| !i.trim().is_empty())
            .cloned();

        let validation_timeout_ms = match vars.get("AUTH_VALIDATION_TIMEOUT_MS") {
            None => DEFAULT_VALIDATION_TIMEOUT_MS,
            Some(value) => value
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    var: "AUTH_VALIDATION_TIMEOUT_MS".to_string(),
                    reason: format!("'{value}' is not a positive integer"),
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
            auth_mode,
            expected_audience,
            expected_issuer,
            validation_timeout: Duration::from_millis(validation_timeout_ms),
            log_format,
        })
    }

    /// Build the validator selected by `auth_mode`.
    ///
    /// The local strategy loads the public key here, so a bad key fails
    /// startup instead of every request.
    ///
    /// # Errors
    ///
    /// - `KeyLoad` if the public key cannot be read or parsed
    /// - `HttpClient` if the delegated HTTP client cannot be built
    pub fn build_validator(&self) -> Result<Arc<dyn TokenValidator>, ConfigError> {
        match &self.auth_mode {
            AuthMode::Local { public_key_path } => {
                let key = VerifyingKey::from_pem_file(public_key_path)?;
                Ok(Arc::new(LocalValidator::new(
                    Arc::new(key),
                    ClaimExpectations {
                        issuer: self.expected_issuer.clone(),
                        audience: Some(self.expected_audience.clone()),
                    },
                )))
            }
            AuthMode::Delegated { validate_url } => {
                let validator =
                    DelegatedValidator::new(validate_url.clone(), self.validation_timeout)
                        .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
                Ok(Arc::new(validator))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn local_vars() -> HashMap<String, String> {
        HashMap::from([(
            "AUTH_PUBLIC_KEY_PATH".to_string(),
            "/etc/wrapups/signing.pem.pub".to_string(),
        )])
    }

    #[test]
    fn test_from_vars_local_defaults() {
        let config = Config::from_vars(&local_vars()).unwrap();

        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(
            config.auth_mode,
            AuthMode::Local {
                public_key_path: PathBuf::from("/etc/wrapups/signing.pem.pub")
            }
        );
        assert_eq!(config.expected_audience, DEFAULT_EXPECTED_AUDIENCE);
        assert_eq!(config.expected_issuer, None);
        assert_eq!(config.validation_timeout, Duration::from_millis(5000));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_from_vars_delegated() {
        let vars = HashMap::from([
            ("AUTH_MODE".to_string(), "Delegated".to_string()),
            (
                "AUTH_VALIDATE_URL".to_string(),
                "http://auth:10000/api/v1/auth/validate".to_string(),
            ),
            ("AUTH_VALIDATION_TIMEOUT_MS".to_string(), "250".to_string()),
            ("AUTH_EXPECTED_ISSUER".to_string(), "wrapups-authserver".to_string()),
        ]);

        let config = Config::from_vars(&vars).unwrap();

        assert_eq!(
            config.auth_mode,
            AuthMode::Delegated {
                validate_url: "http://auth:10000/api/v1/auth/validate".to_string()
            }
        );
        assert_eq!(config.validation_timeout, Duration::from_millis(250));
        assert_eq!(config.expected_issuer.as_deref(), Some("wrapups-authserver"));
    }

    #[test]
    fn test_from_vars_local_requires_public_key() {
        let result = Config::from_vars(&HashMap::new());
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "AUTH_PUBLIC_KEY_PATH"));
    }

    #[test]
    fn test_from_vars_delegated_requires_url() {
        let vars = HashMap::from([("AUTH_MODE".to_string(), "delegated".to_string())]);
        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "AUTH_VALIDATE_URL"));
    }

    #[test]
    fn test_from_vars_invalid_values() {
        for (var, value) in [
            ("AUTH_MODE", "ldap"),
            ("AUTH_VALIDATION_TIMEOUT_MS", "0"),
            ("AUTH_VALIDATION_TIMEOUT_MS", "soon"),
            ("LOG_FORMAT", "xml"),
        ] {
            let mut vars = local_vars();
            vars.insert(var.to_string(), value.to_string());

            let result = Config::from_vars(&vars);
            assert!(
                matches!(&result, Err(ConfigError::InvalidValue { var: v, .. }) if v == var),
                "{var}={value} should be rejected"
            );
        }
    }

    #[test]
    fn test_build_validator_local_missing_key_fails() {
        let config = Config::from_vars(&HashMap::from([(
            "AUTH_PUBLIC_KEY_PATH".to_string(),
            "/nonexistent/key.pub".to_string(),
        )]))
        .unwrap();

        assert!(matches!(
            config.build_validator(),
            Err(ConfigError::KeyLoad(_))
        ));
    }

    #[test]
    fn test_build_validator_selects_strategy() {
        let dir = tempfile::tempdir().unwrap();
        let (_, public_path) = auth_test_utils::write_key_files(dir.path(), 1).unwrap();

        let local = Config::from_vars(&HashMap::from([(
            "AUTH_PUBLIC_KEY_PATH".to_string(),
            public_path.display().to_string(),
        )]))
        .unwrap();
        let local = local.build_validator().unwrap();
        assert_eq!(local.strategy(), "local");
        assert!(local.checks_audience());

        let delegated = Config::from_vars(&HashMap::from([
            ("AUTH_MODE".to_string(), "delegated".to_string()),
            (
                "AUTH_VALIDATE_URL".to_string(),
                "http://127.0.0.1:1/api/v1/auth/validate".to_string(),
            ),
        ]))
        .unwrap();
        let delegated = delegated.build_validator().unwrap();
        assert_eq!(delegated.strategy(), "delegated");
        assert!(!delegated.checks_audience());
    }

    #[test]
    fn test_debug_redacts_public_key_path() {
        let config = Config::from_vars(&local_vars()).unwrap();
        assert!(!format!("{config:?}").contains("signing.pem.pub"));
    }
}
