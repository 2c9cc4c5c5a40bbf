//! Profile directory (`~/.wrapups`).
//!
//! Holds `credential`, `token` and `config`. The directory is kept at mode
//! 0700 and the secret-bearing files at 0600.

use crate::errors::CacheError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

pub const PROFILE_DIR_NAME: &str = ".wrapups";
pub const CREDENTIAL_FILE: &str = "credential";
pub const TOKEN_FILE: &str = "token";
pub const CONFIG_FILE: &str = "config";

const DIR_MODE: u32 = 0o700;
const PRIVATE_FILE_MODE: u32 = 0o600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    dir: PathBuf,
}

impl Profile {
    /// Profile rooted at an explicit directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.wrapups` for the current user.
    ///
    /// # Errors
    ///
    /// `HomeDirectoryUnavailable` if the home directory cannot be resolved.
    pub fn from_home() -> Result<Self, CacheError> {
        dirs::home_dir()
            .map(|home| Self::at(home.join(PROFILE_DIR_NAME)))
            .ok_or(CacheError::HomeDirectoryUnavailable)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn credential_path(&self) -> PathBuf {
        self.dir.join(CREDENTIAL_FILE)
    }

    pub fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Create the directory if needed and tighten it to 0700.
    pub(crate) async fn ensure_dir(&self) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CacheError::io(&self.dir, e))?;

        set_mode(&self.dir, DIR_MODE).await
    }

    /// Replace `path` with `contents`, readable by the owner only.
    pub(crate) async fn write_private(&self, path: &Path, contents: &[u8]) -> Result<(), CacheError> {
        self.ensure_dir().await?;

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(PRIVATE_FILE_MODE);

        let mut file = options
            .open(path)
            .await
            .map_err(|e| CacheError::io(path, e))?;
        file.write_all(contents)
            .await
            .map_err(|e| CacheError::io(path, e))?;
        file.flush().await.map_err(|e| CacheError::io(path, e))?;

        // `mode` only applies on creation; an existing file keeps its old bits
        set_mode(path, PRIVATE_FILE_MODE).await
    }
}

/// Read `path`, mapping a missing file to `None`.
pub(crate) async fn read_optional(path: &Path) -> Result<Option<String>, CacheError> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CacheError::io(path, e)),
    }
}

#[cfg(unix)]
async fn set_mode(path: &Path, mode: u32) -> Result<(), CacheError> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = tokio::fs::metadata(path)
        .await
        .map_err(|e| CacheError::io(path, e))?
        .permissions();
    perms.set_mode(mode);
    tokio::fs::set_permissions(path, perms)
        .await
        .map_err(|e| CacheError::io(path, e))
}

#[cfg(not(unix))]
async fn set_mode(_path: &Path, _mode: u32) -> Result<(), CacheError> {
    Ok(())
}
