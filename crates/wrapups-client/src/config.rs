//! The `config` file.
//!
//! JSON with every field optional:
//!
//! ```json
//! {"auth_url": "http://localhost:10000", "service_url": "http://localhost:10001", "audience": "wrapups"}
//! ```
//!
//! `authserver_url` is accepted as an older name for `auth_url`.

use crate::errors::CacheError;
use crate::profile::{read_optional, Profile};
use serde::{Deserialize, Serialize};

pub const DEFAULT_AUTH_URL: &str = "http://localhost:10000";
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:10001";
pub const DEFAULT_AUDIENCE: &str = "wrapups";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Issuer base URL.
    #[serde(alias = "authserver_url")]
    pub auth_url: String,
    /// Wrapups service base URL.
    pub service_url: String,
    /// `aud` requested for issued tokens.
    pub audience: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            service_url: DEFAULT_SERVICE_URL.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load from the profile, falling back to defaults if the file is absent.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for malformed JSON, `Io` if the file cannot be read.
    pub async fn load(profile: &Profile) -> Result<Self, CacheError> {
        match read_optional(&profile.config_path()).await? {
            None => Ok(Self::default()),
            Some(contents) => serde_json::from_str(&contents)
                .map_err(|e| CacheError::InvalidConfig(e.to_string())),
        }
    }
}
