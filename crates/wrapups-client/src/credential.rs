//! The `credential` file.
//!
//! JSON object with `principal` and `secret`. The older `user` and
//! `password` keys are accepted as aliases.

use crate::errors::CacheError;
use crate::profile::{read_optional, Profile};
use common::secret::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

#[derive(Clone, Serialize, Deserialize)]
pub struct Credential {
    #[serde(alias = "user")]
    pub principal: String,

    #[serde(alias = "password", serialize_with = "serialize_secret")]
    pub secret: SecretString,
}

fn serialize_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("principal", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl Credential {
    pub fn new(principal: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            secret: SecretString::from(secret.into()),
        }
    }

    /// Parse and sanity-check the file contents.
    ///
    /// # Errors
    ///
    /// `InvalidCredential` if the JSON is malformed or a field is empty.
    pub fn parse(contents: &str) -> Result<Self, CacheError> {
        let credential: Credential = serde_json::from_str(contents)
            .map_err(|e| CacheError::InvalidCredential(format!("malformed JSON: {e}")))?;

        if credential.principal.trim().is_empty() {
            return Err(CacheError::InvalidCredential("principal is empty".to_string()));
        }
        if credential.secret.expose_secret().is_empty() {
            return Err(CacheError::InvalidCredential("secret is empty".to_string()));
        }

        Ok(credential)
    }

    /// Load from the profile; `None` if there is no credential file.
    ///
    /// # Errors
    ///
    /// `InvalidCredential` for a malformed file, `Io` if it cannot be read.
    pub async fn load(profile: &Profile) -> Result<Option<Self>, CacheError> {
        read_optional(&profile.credential_path())
            .await?
            .map(|contents| Self::parse(&contents))
            .transpose()
    }

    /// Write to the profile at mode 0600.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be written.
    pub async fn save(&self, profile: &Profile) -> Result<(), CacheError> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| CacheError::InvalidCredential(e.to_string()))?;
        profile.write_private(&profile.credential_path(), &json).await
    }
}
