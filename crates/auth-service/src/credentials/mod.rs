//! Credential store: the directory-like backend the issuer binds against.
//!
//! A bind has three outcomes. `Ok(())` means the secret matched,
//! `BindError::Rejected` means the principal is unknown or the secret is
//! wrong, and `BindError::Unavailable` means the store could not answer.
//! The issuer never retries a bind.

use crate::crypto;
use async_trait::async_trait;
use common::secret::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tracing::instrument;

/// Hash verified for unknown principals so lookup misses cost the same as
/// wrong secrets.
const DUMMY_HASH: &str = "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYqExt7YD3a";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    /// Unknown principal or wrong secret. Terminal for the caller.
    #[error("Credential rejected")]
    Rejected,

    /// The store could not be consulted. Retryable by the caller.
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

/// Verifies a principal's secret.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Bind as `principal` with `secret`.
    ///
    /// # Errors
    ///
    /// `Rejected` on a mismatch, `Unavailable` if the backend cannot answer.
    async fn bind(&self, principal: &str, secret: &SecretString) -> Result<(), BindError>;
}

// =============================================================================
// File-backed store
// =============================================================================

/// Credential store backed by a JSON file of `{"principal": "<bcrypt hash>"}`.
///
/// The file is re-read on every bind, so edits take effect without a
/// restart. A file that becomes unreadable makes binds `Unavailable`.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Open the store, checking that the file parses.
    ///
    /// # Errors
    ///
    /// Returns `BindError::Unavailable` if the file cannot be read or parsed.
    pub async fn open(path: PathBuf) -> Result<Self, BindError> {
        let store = Self { path };
        let entries = store.load().await?;
        tracing::info!(target: "auth.credentials", entries = entries.len(), "Credential store loaded");
        Ok(store)
    }

    async fn load(&self) -> Result<HashMap<String, String>, BindError> {
        let raw = tokio::fs::read(&self.path).await.map_err(|e| {
            BindError::Unavailable(format!("failed to read {}: {e}", self.path.display()))
        })?;

        serde_json::from_slice(&raw).map_err(|e| {
            BindError::Unavailable(format!("failed to parse {}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    #[instrument(skip_all)]
    async fn bind(&self, principal: &str, secret: &SecretString) -> Result<(), BindError> {
        let hashes = self.load().await?;
        let stored_hash = hashes.get(principal).cloned();
        let known = stored_hash.is_some();
        let hash = stored_hash.unwrap_or_else(|| DUMMY_HASH.to_string());

        let secret = secret.clone();
        let matched = tokio::task::spawn_blocking(move || {
            crypto::verify_secret(secret.expose_secret(), &hash)
        })
        .await
        .map_err(|e| BindError::Unavailable(format!("bind task failed: {e}")))?
        .map_err(|e| BindError::Unavailable(e.to_string()))?;

        if known && matched {
            Ok(())
        } else {
            Err(BindError::Rejected)
        }
    }
}

// =============================================================================
// Mock store
// =============================================================================

/// In-memory store for tests. Secrets are compared in plain text.
#[derive(Debug, Default)]
pub struct MockCredentialStore {
    credentials: HashMap<String, String>,
    unavailable: bool,
    bind_calls: AtomicUsize,
}

impl MockCredentialStore {
    /// Store that accepts exactly the given `(principal, secret)` pairs.
    pub fn with_credentials<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            credentials: pairs
                .into_iter()
                .map(|(p, s)| (p.to_string(), s.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    /// Store whose every bind fails with `Unavailable`.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Number of binds attempted so far.
    pub fn bind_count(&self) -> usize {
        self.bind_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
    async fn bind(&self, principal: &str, secret: &SecretString) -> Result<(), BindError> {
        self.bind_calls.fetch_add(1, Ordering::SeqCst);

        if self.unavailable {
            return Err(BindError::Unavailable("mock store offline".to_string()));
        }

        match self.credentials.get(principal) {
            Some(expected) if expected == secret.expose_secret() => Ok(()),
            _ => Err(BindError::Rejected),
        }
    }
}
