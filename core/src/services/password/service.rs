//! bcrypt-backed credential verifier

use crate::errors::{AuthError, DomainError, DomainResult};

/// Hashes new passwords and checks presented ones.
///
/// bcrypt is CPU bound, so both operations run on the blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    cost: u32,
}

impl PasswordService {
    /// Create a service hashing with a fixed work factor (4..=31)
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Produce a salted hash of `plain`
    pub async fn hash(&self, plain: &str) -> DomainResult<String> {
        let plain = plain.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
            .await
            .map_err(|e| DomainError::fatal(format!("Hashing task failed: {}", e)))?
            .map_err(|e| AuthError::HashingFailed(e.to_string()).into())
    }

    /// Compare `plain` against a stored hash.
    ///
    /// Returns `false` for a wrong password and for a malformed hash alike.
    pub async fn verify(&self, plain: &str, hash: &str) -> bool {
        let plain = plain.to_owned();
        let hash = hash.to_owned();

        match tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hash)).await {
            Ok(Ok(matched)) => matched,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, event = "password_hash_unreadable", "Stored password hash could not be parsed");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, event = "password_verify_task_failed", "Password verification task failed");
                false
            }
        }
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
