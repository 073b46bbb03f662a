use std::fmt;

use thiserror::Error;

/// A single violated validation rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Attribute the rule applies to (e.g. "email")
    pub field: &'static str,
    /// Machine-readable rule name: "blank", "too_long", "invalid", "taken", ...
    pub code: &'static str,
    /// Human-readable message, e.g. "Email is invalid"
    pub message: String,
}

/// Every rule a save attempt violated, in the order they were checked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, code: &'static str, message: impl fmt::Display) {
        self.0.push(FieldError {
            field,
            code,
            message: message.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Check whether any rule on the given field was violated
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Messages in check order
    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.message.as_str()).collect()
    }

    /// `Ok(())` when nothing was violated
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join(", "))
    }
}

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Raised by the store when the unique email index rejects a write
    #[error("Email '{email}' has already been taken")]
    EmailTaken { email: String },

    #[error("Invalid token: {message}")]
    InvalidToken { message: String },

    #[error("Password reset has expired")]
    ResetExpired,

    #[error("Hashing error: {message}")]
    Hashing { message: String },

    #[error("Mail delivery error: {message}")]
    Mail { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn email_taken(email: impl Into<String>) -> Self {
        Self::EmailTaken {
            email: email.into(),
        }
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
            message: message.into(),
        }
    }

    pub fn mail(message: impl Into<String>) -> Self {
        Self::Mail {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Single-rule validation failure
    pub fn invalid(field: &'static str, code: &'static str, message: impl fmt::Display) -> Self {
        let mut errors = ValidationErrors::new();
        errors.push(field, code, message);
        Self::Validation(errors)
    }

    /// True for both the store-level unique violation and the pre-save
    /// uniqueness check, so callers can show "email already taken" either way
    pub fn is_email_taken(&self) -> bool {
        match self {
            Self::EmailTaken { .. } => true,
            Self::Validation(errors) => errors
                .iter()
                .any(|e| e.field == "email" && e.code == "taken"),
            _ => false,
        }
    }
}
