//! Credential hash verification and signing-key bootstrap.

use crate::errors::AuthError;
use common::jwt::{generate_key_pair, CodecError, SigningKey};
use common::secret::ExposeSecret;
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Verify a credential secret against a bcrypt hash.
///
/// # Errors
///
/// Returns `AuthError::Internal` if `hash` is not a bcrypt hash.
#[instrument(skip_all)]
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(secret, hash)
        .map_err(|e| AuthError::Internal(format!("Secret verification failed: {}", e)))
}

/// Path of the public half written next to a generated private key.
pub fn public_key_path(signing_key_path: &Path) -> PathBuf {
    let mut name = OsString::from(signing_key_path.as_os_str());
    name.push(".pub");
    PathBuf::from(name)
}

/// Load the signing key, generating it first when allowed and missing.
///
/// With `generate_if_missing`, a fresh key pair is written to
/// `signing_key_path` (mode 0600) and [`public_key_path`] (mode 0644) so
/// verifying services can be pointed at the public half.
///
/// # Errors
///
/// Returns `CodecError::KeyLoad` if the key cannot be read, parsed, or
/// written. Callers treat this as fatal to startup.
#[instrument(skip_all)]
pub fn initialize_signing_key(
    signing_key_path: &Path,
    generate_if_missing: bool,
) -> Result<SigningKey, CodecError> {
    if signing_key_path.exists() || !generate_if_missing {
        return SigningKey::from_pem_file(signing_key_path);
    }

    tracing::info!(target: "auth.crypto", "No signing key found, generating a new key pair");

    let generated = generate_key_pair()?;
    write_new_file(
        signing_key_path,
        generated.private_key_pem.expose_secret().as_bytes(),
        0o600,
    )?;
    write_new_file(
        &public_key_path(signing_key_path),
        generated.public_key_pem.as_bytes(),
        0o644,
    )?;

    Ok(generated.signing_key)
}

fn write_new_file(path: &Path, contents: &[u8], mode: u32) -> Result<(), CodecError> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options
        .open(path)
        .map_err(|e| CodecError::KeyLoad(format!("failed to create {}: {e}", path.display())))?;
    file.write_all(contents)
        .map_err(|e| CodecError::KeyLoad(format!("failed to write {}: {e}", path.display())))
}
