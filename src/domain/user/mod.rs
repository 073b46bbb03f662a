//! User domain
//!
//! Account entity, attribute validation, the token kinds used for remember-me,
//! activation and password reset, and the repository trait.

mod entity;
mod repository;
mod token;
mod validation;

pub use entity::{NewUser, User, UserId, UserRecord, PASSWORD_RESET_TTL_HOURS};
pub use repository::UserRepository;
#[cfg(test)]
pub use repository::MockUserRepository;
pub use token::{ActivationToken, RememberToken, ResetToken, TokenKind};
pub use validation::{
    normalize_email, record_all, validate_email, validate_name, validate_password, validate_user,
    PasswordInput, UserValidationError, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MIN_PASSWORD_LENGTH,
};
