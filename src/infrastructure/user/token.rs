//! Random token generation
//!
//! Tokens are 32 bytes from the thread RNG, encoded as URL-safe base64 without
//! padding so they can be embedded in a link path as-is.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use std::fmt::Debug;

/// Random bytes per token
pub const TOKEN_BYTES: usize = 32;

/// Source of fresh plaintext tokens
pub trait TokenGenerator: Send + Sync + Debug {
    fn generate(&self) -> String;
}

/// Generator for URL-safe random tokens
#[derive(Debug, Clone, Default)]
pub struct UrlSafeTokenGenerator;

impl UrlSafeTokenGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl TokenGenerator for UrlSafeTokenGenerator {
    fn generate(&self) -> String {
        let mut random_bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        URL_SAFE_NO_PAD.encode(&random_bytes)
    }
}

/// Generate a token with the default generator
pub fn new_token() -> String {
    UrlSafeTokenGenerator::new().generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_length() {
        // 32 bytes -> 43 base64 chars without padding
        assert_eq!(new_token().len(), 43);
        assert_eq!(UrlSafeTokenGenerator::new().generate().len(), 43);
    }

    #[test]
    fn test_token_is_url_safe() {
        for _ in 0..50 {
            let token = new_token();
            assert!(token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        }
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens: HashSet<String> = (0..100).map(|_| new_token()).collect();
        assert_eq!(tokens.len(), 100);
    }
}
