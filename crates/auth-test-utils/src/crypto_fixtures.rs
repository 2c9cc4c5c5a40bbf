//! Deterministic cryptographic fixtures for testing
//!
//! Provides reproducible Ed25519 keypairs and on-disk credential/key files.
//! All key fixtures are deterministic based on seed values.

use base64::engine::general_purpose;
use base64::Engine;
use common::jwt::{SigningKey, VerifyingKey};
use ring::signature::{Ed25519KeyPair, KeyPair};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// bcrypt cost used for fixture credential files (bcrypt's minimum, fast).
pub const TEST_BCRYPT_COST: u32 = 4;

/// Test fixture error type
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),

    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Seeded key pair with PEM encodings.
#[derive(Clone)]
pub struct TestKeyPair {
    pub signing_key: SigningKey,
    pub verifying_key: VerifyingKey,
    /// PKCS#8 v1 `PRIVATE KEY` PEM (the layout openssl writes)
    pub private_key_pem: String,
    /// Raw-key `PUBLIC KEY` PEM
    pub public_key_pem: String,
}

/// Expand a one-byte seed into a 32-byte Ed25519 seed.
pub fn test_seed_bytes(seed: u8) -> [u8; 32] {
    let mut seed_bytes = [0u8; 32];
    seed_bytes[0] = seed;
    for (i, byte) in seed_bytes.iter_mut().enumerate().skip(1) {
        *byte = seed.wrapping_mul(i as u8).wrapping_add(i as u8);
    }
    seed_bytes
}

/// Generate a deterministic Ed25519 key pair for testing.
///
/// The same seed always produces the same keypair.
///
/// ```rust,ignore
/// let keys = test_key_pair(1)?;
/// assert_eq!(keys.verifying_key, test_key_pair(1)?.verifying_key);
/// ```
pub fn test_key_pair(seed: u8) -> Result<TestKeyPair, FixtureError> {
    let seed_bytes = test_seed_bytes(seed);

    let key_pair = Ed25519KeyPair::from_seed_unchecked(&seed_bytes)
        .map_err(|e| FixtureError::Crypto(format!("Failed to generate test keypair: {:?}", e)))?;

    let public_key_pem = pem(
        "PUBLIC KEY",
        &general_purpose::STANDARD.encode(key_pair.public_key().as_ref()),
    );

    let pkcs8 = build_pkcs8_from_seed(&seed_bytes);
    let private_key_pem = pem("PRIVATE KEY", &general_purpose::STANDARD.encode(&pkcs8));

    let signing_key = SigningKey::from_pkcs8_der(&pkcs8)
        .map_err(|e| FixtureError::Crypto(e.to_string()))?;
    let verifying_key =
        VerifyingKey::from_pem(&public_key_pem).map_err(|e| FixtureError::Crypto(e.to_string()))?;

    Ok(TestKeyPair {
        signing_key,
        verifying_key,
        private_key_pem,
        public_key_pem,
    })
}

fn pem(label: &str, body: &str) -> String {
    format!("-----BEGIN {label}-----\n{body}\n-----END {label}-----\n")
}

/// Build PKCS#8 v1 document from Ed25519 seed
///
/// Test-only. Production keys come from `ring::rand::SystemRandom`.
pub fn build_pkcs8_from_seed(seed: &[u8; 32]) -> Vec<u8> {
    // SEQUENCE { INTEGER 0, SEQUENCE { OID 1.3.101.112 }, OCTET STRING { OCTET STRING seed } }
    let mut pkcs8 = vec![
        0x30, 0x2e, // SEQUENCE, 46 bytes
        0x02, 0x01, 0x00, // version 0
        0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, // Ed25519 algorithm identifier
        0x04, 0x22, 0x04, 0x20, // private key octet strings
    ];
    pkcs8.extend_from_slice(seed);
    pkcs8
}

/// Write `signing.pem` and `signing.pem.pub` for `seed` into `dir`.
///
/// Returns `(private_key_path, public_key_path)`.
pub fn write_key_files(dir: &Path, seed: u8) -> Result<(PathBuf, PathBuf), FixtureError> {
    let keys = test_key_pair(seed)?;
    let private_path = dir.join("signing.pem");
    let public_path = dir.join("signing.pem.pub");

    std::fs::write(&private_path, keys.private_key_pem)?;
    std::fs::write(&public_path, keys.public_key_pem)?;

    Ok((private_path, public_path))
}

/// Write a credential store file mapping principals to bcrypt hashes.
pub fn write_credentials_file(
    dir: &Path,
    credentials: &[(&str, &str)],
) -> Result<PathBuf, FixtureError> {
    let hashes = credentials
        .iter()
        .map(|(principal, secret)| {
            bcrypt::hash(secret, TEST_BCRYPT_COST)
                .map(|hash| (principal.to_string(), hash))
                .map_err(|e| FixtureError::Crypto(format!("bcrypt failed: {e}")))
        })
        .collect::<Result<HashMap<_, _>, _>>()?;

    let path = dir.join("credentials.json");
    let json = serde_json::to_string_pretty(&hashes)
        .map_err(|e| FixtureError::Crypto(format!("serialize failed: {e}")))?;
    std::fs::write(&path, json)?;

    Ok(path)
}
