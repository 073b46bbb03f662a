//! Digest hashing using Argon2
//!
//! Passwords and every kind of token (remember, activation, reset) are stored
//! as Argon2id PHC strings. The salt is random per call, so hashing the same
//! input twice yields different digests that both verify.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use serde::Deserialize;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for one-way digest operations
pub trait DigestHasher: Send + Sync + Debug {
    /// Hash a secret
    fn hash(&self, plaintext: &str) -> Result<String, DomainError>;

    /// Verify a secret against a digest; malformed digests never verify
    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}

/// Work factor used when creating digests
///
/// `Minimum` keeps test runs fast; `Default` is the production setting.
/// Verification reads the parameters embedded in the digest, so digests made
/// under either profile verify under both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashCost {
    Minimum,
    #[default]
    Default,
}

impl HashCost {
    fn params(self) -> Result<Params, argon2::Error> {
        match self {
            Self::Minimum => Params::new(
                Params::MIN_M_COST,
                Params::MIN_T_COST,
                Params::MIN_P_COST,
                None,
            ),
            Self::Default => Ok(Params::default()),
        }
    }
}

/// Argon2id digest hasher
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    cost: HashCost,
}

impl Argon2Hasher {
    /// Create a new Argon2 hasher with the given cost profile
    pub fn new(cost: HashCost) -> Self {
        Self { cost }
    }

    /// Hasher for automated tests
    pub fn minimum_cost() -> Self {
        Self::new(HashCost::Minimum)
    }

    pub fn cost(&self) -> HashCost {
        self.cost
    }
}

impl DigestHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, DomainError> {
        let params = self
            .cost
            .params()
            .map_err(|e| DomainError::hashing(format!("Invalid Argon2 parameters: {}", e)))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);

        argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::hashing(format!("Failed to hash secret: {}", e)))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let parsed_hash = match PasswordHash::new(digest) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::minimum_cost();
        let password = "secret1";

        let hash = hasher.hash(password).unwrap();

        assert!(hasher.verify(password, &hash));
        assert!(!hasher.verify("secret2", &hash));
        assert!(!hash.contains(password));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = Argon2Hasher::minimum_cost();

        let hash1 = hasher.hash("token").unwrap();
        let hash2 = hasher.hash("token").unwrap();

        assert_ne!(hash1, hash2);
        assert!(hasher.verify("token", &hash1));
        assert!(hasher.verify("token", &hash2));
    }

    #[test]
    fn test_minimum_cost_is_embedded_in_digest() {
        let hash = Argon2Hasher::minimum_cost().hash("token").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=8,t=1,p=1"));
    }

    #[test]
    fn test_verify_across_cost_profiles() {
        let fast = Argon2Hasher::minimum_cost();
        let strong = Argon2Hasher::new(HashCost::Default);

        let hash = fast.hash("token").unwrap();
        assert!(strong.verify("token", &hash));
    }

    #[test]
    fn test_verify_invalid_digest() {
        let hasher = Argon2Hasher::minimum_cost();

        assert!(!hasher.verify("password", "invalid_hash_format"));
        assert!(!hasher.verify("password", ""));
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(Argon2Hasher::default().cost(), HashCost::Default);
    }
}
