//! Mail infrastructure module
//!
//! Transports for the `Mailer` trait (SMTP and in-memory) and the composer of
//! account emails.

mod in_memory;
mod smtp;
mod user_mailer;

pub use in_memory::InMemoryMailer;
pub use smtp::{EmailError, SmtpMailer};
pub use user_mailer::UserMailer;
