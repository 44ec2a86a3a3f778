//! Static bearer-token check for API clients.

use sha2::{Digest, Sha256};

/// Validates bearer tokens against the single configured API token.
///
/// Only the SHA-256 digest of the configured token is kept in memory.
#[derive(Clone)]
pub struct BearerTokenValidator {
    token_hash: String,
}

impl BearerTokenValidator {
    /// Create a validator for the configured token.
    pub fn new(api_token: &str) -> Self {
        Self {
            token_hash: Self::hash_token(api_token),
        }
    }

    /// Hash a token for comparison.
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Check whether a presented token matches the configured one.
    pub fn validate(&self, token: &str) -> bool {
        !token.is_empty() && Self::hash_token(token) == self.token_hash
    }
}
