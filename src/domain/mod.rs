//! Domain layer - Core business logic and entities

pub mod error;
pub mod mail;
pub mod micropost;
pub mod user;

pub use error::{DomainError, FieldError, ValidationErrors};
pub use mail::{MailMessage, Mailer};
#[cfg(test)]
pub use mail::MockMailer;
pub use micropost::{Micropost, MicropostId, MicropostRepository, NewMicropost};
pub use user::{
    ActivationToken, NewUser, RememberToken, ResetToken, TokenKind, User, UserId, UserRepository,
};
