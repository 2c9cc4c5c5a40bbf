//! Redacting wrappers for credential secrets, key material and bearer tokens.
//!
//! Re-exports [`secrecy`] so every crate in the workspace reaches for the
//! same types. `SecretString` prints `[REDACTED]` under `Debug`, so a struct
//! that derives `Debug` around one is safe to hand to `tracing`.
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct Credential {
//!     principal: String,
//!     secret: SecretString,
//! }
//!
//! let credential = Credential {
//!     principal: "alice".to_string(),
//!     secret: SecretString::from("hunter2"),
//! };
//!
//! assert!(!format!("{credential:?}").contains("hunter2"));
//! assert_eq!(credential.secret.expose_secret(), "hunter2");
//! ```
//!
//! Values in this workspace that must be `SecretString`:
//! - credential secrets (request bodies, the client credential file)
//! - issued tokens held by the client cache
//! - PEM-encoded private keys

pub use secrecy::{ExposeSecret, SecretBox, SecretString};
