//! Token kinds and the plaintext tokens handed back to callers
//!
//! Only digests are persisted. The plaintext is returned from the operation
//! that minted it and must be passed explicitly to whatever needs it next
//! (a cookie, an email link).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which digest on the user a token is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Persistent "remember me" login
    Remember,
    /// Proof of control over the registered email
    Activation,
    /// Time-limited password change
    Reset,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remember => "remember",
            Self::Activation => "activation",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! plaintext_token {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            pub fn new(token: impl Into<String>) -> Self {
                Self(token.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&"[REDACTED]").finish()
            }
        }
    };
}

plaintext_token!(
    /// Plaintext remember-me token, for the client-side cookie
    RememberToken
);

plaintext_token!(
    /// Plaintext activation token, for the activation link
    ActivationToken
);

plaintext_token!(
    /// Plaintext reset token, for the password reset link
    ResetToken
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_kind_names() {
        assert_eq!(TokenKind::Remember.as_str(), "remember");
        assert_eq!(TokenKind::Activation.to_string(), "activation");
        assert_eq!(TokenKind::Reset.as_str(), "reset");
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = ResetToken::new("super-secret");
        let debug = format!("{:?}", token);

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("ResetToken"));
    }

    #[test]
    fn test_token_exposes_plaintext() {
        let token = RememberToken::new("cookie-value");
        assert_eq!(token.as_str(), "cookie-value");
        assert_eq!(token, RememberToken::new("cookie-value"));
    }
}
