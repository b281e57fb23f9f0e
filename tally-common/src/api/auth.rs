//! Shared admin password checking
//!
//! Admin requests carry the password either in the `x-admin-pass` header or in
//! the `admin` query parameter. Only the SHA-256 digest of the configured
//! password is kept in memory; candidates are hashed and compared digest to
//! digest.

use sha2::{Digest, Sha256};

/// Request header carrying the admin password
pub const ADMIN_PASS_HEADER: &str = "x-admin-pass";

/// Query parameter carrying the admin password
pub const ADMIN_PASS_QUERY: &str = "admin";

/// Calculate the SHA-256 of a password as 64 hex characters
///
/// # Examples
///
/// ```
/// use tally_common::api::auth::calculate_hash;
///
/// let hash = calculate_hash("change-me");
/// assert_eq!(hash.len(), 64);
/// assert_eq!(hash, calculate_hash("change-me"));
/// ```
pub fn calculate_hash(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Configured admin password
#[derive(Clone)]
pub struct AdminPassword {
    hash: String,
}

impl AdminPassword {
    pub fn new(password: &str) -> Self {
        Self {
            hash: calculate_hash(password),
        }
    }

    /// Check a password supplied by a client
    ///
    /// Empty input never matches.
    pub fn verify(&self, provided: &str) -> bool {
        if provided.is_empty() {
            return false;
        }
        let provided_hash = calculate_hash(provided);
        provided_hash
            .bytes()
            .zip(self.hash.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for AdminPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminPassword(..)")
    }
}
