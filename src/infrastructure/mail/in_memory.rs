//! Mail transport that records deliveries instead of sending them

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{DomainError, MailMessage, Mailer};

/// In-memory implementation of Mailer
#[derive(Debug, Default)]
pub struct InMemoryMailer {
    deliveries: Arc<RwLock<Vec<MailMessage>>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message delivered so far, oldest first
    pub async fn deliveries(&self) -> Vec<MailMessage> {
        self.deliveries.read().await.clone()
    }

    pub async fn last_delivery(&self) -> Option<MailMessage> {
        self.deliveries.read().await.last().cloned()
    }

    pub async fn clear(&self) {
        self.deliveries.write().await.clear();
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn deliver(&self, message: MailMessage) -> Result<(), DomainError> {
        debug!(to = %message.to, subject = %message.subject, "Recorded email delivery");
        self.deliveries.write().await.push(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str) -> MailMessage {
        MailMessage {
            to: to.to_string(),
            subject: "Subject".to_string(),
            text_body: "text".to_string(),
            html_body: "<p>html</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_records_in_order() {
        let mailer = InMemoryMailer::new();

        mailer.deliver(message("a@example.com")).await.unwrap();
        mailer.deliver(message("b@example.com")).await.unwrap();

        let deliveries = mailer.deliveries().await;
        assert_eq!(deliveries.len(), 2);
        assert_eq!(deliveries[0].to, "a@example.com");
        assert_eq!(mailer.last_delivery().await.unwrap().to, "b@example.com");
    }

    #[tokio::test]
    async fn test_clear() {
        let mailer = InMemoryMailer::new();
        mailer.deliver(message("a@example.com")).await.unwrap();

        mailer.clear().await;

        assert!(mailer.deliveries().await.is_empty());
        assert!(mailer.last_delivery().await.is_none());
    }
}
