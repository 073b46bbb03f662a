//! Account emails: activation and password reset
//!
//! Each message carries a link built from the configured base URL, the
//! plaintext token and the recipient's email, e.g.
//! `{base}/account_activations/{token}/edit?email=ann%40example.com`.

use std::fmt;
use std::sync::Arc;

use askama::Template;
use url::Url;

use crate::domain::user::{ActivationToken, ResetToken, User, PASSWORD_RESET_TTL_HOURS};
use crate::domain::{DomainError, MailMessage, Mailer};

const ACTIVATION_SUBJECT: &str = "Account activation";
const PASSWORD_RESET_SUBJECT: &str = "Password reset";

#[derive(Template)]
#[template(path = "email/account_activation.html")]
struct AccountActivationHtml<'a> {
    name: &'a str,
    link: &'a str,
}

#[derive(Template)]
#[template(path = "email/account_activation.txt")]
struct AccountActivationText<'a> {
    name: &'a str,
    link: &'a str,
}

#[derive(Template)]
#[template(path = "email/password_reset.html")]
struct PasswordResetHtml<'a> {
    link: &'a str,
    ttl_hours: i64,
}

#[derive(Template)]
#[template(path = "email/password_reset.txt")]
struct PasswordResetText<'a> {
    link: &'a str,
    ttl_hours: i64,
}

/// Composes account emails and hands them to a transport
#[derive(Clone)]
pub struct UserMailer {
    mailer: Arc<dyn Mailer>,
    base_url: Url,
}

impl fmt::Debug for UserMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserMailer")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl UserMailer {
    /// Create a mailer whose links are rooted at `base_url`
    pub fn new(mailer: Arc<dyn Mailer>, base_url: &str) -> Result<Self, DomainError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            DomainError::configuration(format!("Invalid mail base URL '{}': {}", base_url, e))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(DomainError::configuration(format!(
                "Mail base URL '{}' cannot carry a path",
                base_url
            )));
        }

        Ok(Self { mailer, base_url })
    }

    /// Render the activation message for a freshly signed-up user
    pub fn account_activation(
        &self,
        user: &User,
        token: &ActivationToken,
    ) -> Result<MailMessage, DomainError> {
        let link = self.edit_link("account_activations", token.as_str(), user.email());
        let name = user.name();

        Ok(MailMessage {
            to: user.email().to_string(),
            subject: ACTIVATION_SUBJECT.to_string(),
            text_body: render(AccountActivationText { name, link: &link })?,
            html_body: render(AccountActivationHtml { name, link: &link })?,
        })
    }

    /// Render the password reset message
    pub fn password_reset(
        &self,
        user: &User,
        token: &ResetToken,
    ) -> Result<MailMessage, DomainError> {
        let link = self.edit_link("password_resets", token.as_str(), user.email());
        let ttl_hours = PASSWORD_RESET_TTL_HOURS;

        Ok(MailMessage {
            to: user.email().to_string(),
            subject: PASSWORD_RESET_SUBJECT.to_string(),
            text_body: render(PasswordResetText { link: &link, ttl_hours })?,
            html_body: render(PasswordResetHtml { link: &link, ttl_hours })?,
        })
    }

    pub async fn send_account_activation(
        &self,
        user: &User,
        token: &ActivationToken,
    ) -> Result<(), DomainError> {
        let message = self.account_activation(user, token)?;
        self.mailer.deliver(message).await
    }

    pub async fn send_password_reset(
        &self,
        user: &User,
        token: &ResetToken,
    ) -> Result<(), DomainError> {
        let message = self.password_reset(user, token)?;
        self.mailer.deliver(message).await
    }

    fn edit_link(&self, resource: &str, token: &str, email: &str) -> String {
        let mut url = self.base_url.clone();

        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([resource, token, "edit"]);
        }
        url.set_fragment(None);
        url.query_pairs_mut().clear().append_pair("email", email);

        url.into()
    }
}

fn render(template: impl Template) -> Result<String, DomainError> {
    template
        .render()
        .map_err(|e| DomainError::mail(format!("Failed to render email template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{NewUser, UserId};
    use crate::domain::MockMailer;
    use crate::infrastructure::mail::InMemoryMailer;
    use chrono::Utc;

    fn test_user() -> User {
        let new_user = NewUser::new("Ann", "ann@example.com", "pd", "ad");
        User::inserted(UserId::new(1), new_user, Utc::now())
    }

    fn mailer_with(base_url: &str) -> (UserMailer, Arc<InMemoryMailer>) {
        let transport = Arc::new(InMemoryMailer::new());
        let mailer = UserMailer::new(transport.clone(), base_url).unwrap();
        (mailer, transport)
    }

    #[test]
    fn test_activation_link() {
        let (mailer, _) = mailer_with("http://localhost:3000");
        let message = mailer
            .account_activation(&test_user(), &ActivationToken::new("tok123"))
            .unwrap();

        assert_eq!(message.to, "ann@example.com");
        assert_eq!(message.subject, "Account activation");
        assert!(message.text_body.contains("Hi Ann,"));
        assert!(message.text_body.contains(
            "http://localhost:3000/account_activations/tok123/edit?email=ann%40example.com"
        ));
        assert!(message.html_body.contains("Activate"));
    }

    #[test]
    fn test_reset_link_keeps_base_path() {
        let (mailer, _) = mailer_with("https://example.com/app/");
        let message = mailer
            .password_reset(&test_user(), &ResetToken::new("xyz"))
            .unwrap();

        assert_eq!(message.subject, "Password reset");
        assert!(message.text_body.contains(
            "https://example.com/app/password_resets/xyz/edit?email=ann%40example.com"
        ));
        assert!(message.text_body.contains("expire in 2 hours"));
    }

    #[test]
    fn test_invalid_base_url() {
        let transport = Arc::new(InMemoryMailer::new());

        let result = UserMailer::new(transport.clone(), "not a url");
        assert!(matches!(result, Err(DomainError::Configuration { .. })));

        let result = UserMailer::new(transport, "mailto:ann@example.com");
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_send_delivers_through_transport() {
        let (mailer, transport) = mailer_with("http://localhost:3000");

        mailer
            .send_password_reset(&test_user(), &ResetToken::new("xyz"))
            .await
            .unwrap();

        let deliveries = transport.deliveries().await;
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].to, "ann@example.com");
    }

    #[tokio::test]
    async fn test_send_propagates_transport_failure() {
        let mut transport = MockMailer::new();
        transport
            .expect_deliver()
            .times(1)
            .returning(|_| Err(DomainError::mail("connection refused")));

        let mailer = UserMailer::new(Arc::new(transport), "http://localhost:3000").unwrap();
        let result = mailer
            .send_account_activation(&test_user(), &ActivationToken::new("tok"))
            .await;

        assert!(matches!(result, Err(DomainError::Mail { .. })));
    }
}
