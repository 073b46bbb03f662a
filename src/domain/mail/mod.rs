//! Outgoing mail contract

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// A rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Delivers rendered messages
///
/// Delivery is awaited inline; a failure is returned to the caller unchanged,
/// which decides whether to retry or surface it.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, message: MailMessage) -> Result<(), DomainError>;
}
