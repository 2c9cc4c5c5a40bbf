//! Fixed test identities for deterministic tests.

// Principals
pub const TEST_PRINCIPAL_ALICE: &str = "alice";
pub const TEST_PRINCIPAL_BOB: &str = "bob";

// Secrets (never used outside tests)
pub const TEST_SECRET_ALICE: &str = "alice-secret-do-not-use-in-production";
pub const TEST_SECRET_BOB: &str = "bob-secret-do-not-use-in-production";

// Claim values
pub const TEST_ISSUER: &str = "wrapups-authserver";
pub const TEST_AUDIENCE: &str = "wrapups";
pub const TEST_OTHER_AUDIENCE: &str = "billing";

// Key seeds
pub const TEST_KEY_SEED_ISSUER: u8 = 1;
pub const TEST_KEY_SEED_FOREIGN: u8 = 2;
