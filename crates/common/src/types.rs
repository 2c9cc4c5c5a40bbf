//! Data types shared by the issuer, the wrapups service and the client.

use crate::secret::SecretString;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated identity carried in the `sub` claim and the request context.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Wrap a principal name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the principal name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Principal([REDACTED])")
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /api/v1/auth/token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueTokenRequest {
    /// Principal to bind as.
    pub principal: String,

    /// Credential secret.
    #[serde(serialize_with = "serialize_secret")]
    pub secret: SecretString,

    /// Host or service the token is requested for.
    pub audience: String,
}

fn serialize_secret<S: serde::Serializer>(
    secret: &SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use secrecy::ExposeSecret;
    serializer.serialize_str(secret.expose_secret())
}

/// Successful response of `POST /api/v1/auth/token`.
#[derive(Clone, Serialize, Deserialize)]
pub struct IssueTokenResponse {
    /// Compact signed token.
    pub token: String,

    /// Seconds until the token expires.
    pub expires_in: u64,
}

impl fmt::Debug for IssueTokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssueTokenResponse")
            .field("token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Body of `POST /api/v1/auth/validate`.
#[derive(Clone, Serialize, Deserialize)]
pub struct ValidateTokenRequest {
    /// Token to check.
    pub token: String,
}

impl fmt::Debug for ValidateTokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidateTokenRequest")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Response of `POST /api/v1/auth/validate`.
///
/// `principal` is empty when `valid` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateTokenResponse {
    pub valid: bool,
    #[serde(default)]
    pub principal: String,
}

/// Wrap-up note stored by the wrapups service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wrapup {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub wrapup: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub note: String,
    pub create_time: DateTime<Utc>,
}

impl Wrapup {
    /// Whether any free-text field contains `filter` (case-insensitive).
    ///
    /// An empty filter matches everything.
    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        let needle = filter.to_lowercase();
        [&self.title, &self.wrapup, &self.comment, &self.note]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Body of `POST /api/v1/wrapups`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWrapup {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub wrapup: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub note: String,
}

/// Response of `GET /api/v1/wrapups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListWrapupsResponse {
    pub count: usize,
    pub wrapups: Vec<Wrapup>,
}
