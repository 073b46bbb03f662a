//! SMTP mail transport using lettre

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::{authentication::Credentials, Error as SmtpError},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tracing::info;

use crate::config::SmtpConfig;
use crate::domain::{DomainError, MailMessage, Mailer};

/// Errors that can occur when sending email
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

impl From<EmailError> for DomainError {
    fn from(err: EmailError) -> Self {
        DomainError::mail(err.to_string())
    }
}

/// Delivers messages over STARTTLS SMTP
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Create a transport from configuration; no connection is opened yet
    pub fn new(config: &SmtpConfig, from_address: &str) -> Result<Self, EmailError> {
        let from = parse_mailbox(from_address)?;

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?.port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, message: &MailMessage) -> Result<Message, EmailError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&message.to)?)
            .subject(message.subject.as_str())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(message.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(message.html_body.clone()),
                    ),
            )?;

        Ok(email)
    }

    async fn send(&self, message: &MailMessage) -> Result<(), EmailError> {
        let email = self.build_message(message)?;
        self.transport.send(email).await?;

        info!(to = %message.to, subject = %message.subject, "Email sent successfully");
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn deliver(&self, message: MailMessage) -> Result<(), DomainError> {
        self.send(&message).await.map_err(DomainError::from)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .parse()
        .map_err(|_| EmailError::InvalidAddress(address.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 2525,
            username: Some("user".to_string()),
            password: Some("pass".to_string()),
        }
    }

    fn message(to: &str) -> MailMessage {
        MailMessage {
            to: to.to_string(),
            subject: "Account activation".to_string(),
            text_body: "text".to_string(),
            html_body: "<p>html</p>".to_string(),
        }
    }

    #[test]
    fn test_invalid_from_address() {
        let result = SmtpMailer::new(&config(), "not an address");
        assert!(matches!(result, Err(EmailError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_build_multipart_message() {
        let mailer = SmtpMailer::new(&config(), "Sample App <noreply@example.com>").unwrap();

        let email = mailer.build_message(&message("ann@example.com")).unwrap();
        let formatted = String::from_utf8(email.formatted()).unwrap();

        assert!(formatted.contains("To: ann@example.com"));
        assert!(formatted.contains("Subject: Account activation"));
        assert!(formatted.contains("multipart/alternative"));
    }

    #[tokio::test]
    async fn test_invalid_recipient_maps_to_mail_error() {
        let mailer = SmtpMailer::new(&config(), "noreply@example.com").unwrap();

        let err = mailer.build_message(&message("bogus")).unwrap_err();
        let domain: DomainError = err.into();

        assert!(matches!(domain, DomainError::Mail { .. }));
        assert!(domain.to_string().contains("bogus"));
    }
}
