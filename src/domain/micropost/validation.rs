//! Micropost validation utilities

use thiserror::Error;

/// Errors that can occur during micropost validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MicropostValidationError {
    #[error("Content can't be blank")]
    BlankContent,

    #[error("Content is too long (maximum is {0} characters)")]
    ContentTooLong(usize),
}

impl MicropostValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BlankContent => "blank",
            Self::ContentTooLong(_) => "too_long",
        }
    }
}

pub const MAX_CONTENT_LENGTH: usize = 140;

/// Validate post content
///
/// Rules:
/// - Cannot be blank
/// - Maximum 140 characters
pub fn validate_content(content: &str) -> Result<(), MicropostValidationError> {
    if content.trim().is_empty() {
        return Err(MicropostValidationError::BlankContent);
    }

    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(MicropostValidationError::ContentTooLong(MAX_CONTENT_LENGTH));
    }

    Ok(())
}
