//! Account commands - sign-up, activation and password reset from the shell

use clap::Args;

use crate::config::AppConfig;
use crate::domain::DomainError;
use crate::infrastructure::user::{ResetPasswordRequest, SignUpRequest};

#[derive(Debug, Args)]
pub struct SignUpArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    #[arg(long)]
    pub password_confirmation: Option<String>,
}

#[derive(Debug, Args)]
pub struct ActivateArgs {
    #[arg(long)]
    pub email: String,

    /// Token from the activation link
    #[arg(long)]
    pub token: String,
}

#[derive(Debug, Args)]
pub struct RequestResetArgs {
    #[arg(long)]
    pub email: String,
}

#[derive(Debug, Args)]
pub struct ResetPasswordArgs {
    #[arg(long)]
    pub email: String,

    /// Token from the reset link
    #[arg(long)]
    pub token: String,

    #[arg(long)]
    pub password: String,

    #[arg(long)]
    pub password_confirmation: Option<String>,
}

pub async fn sign_up(args: SignUpArgs, config: &AppConfig) -> anyhow::Result<()> {
    let service = crate::create_user_service(config).await?;

    let registration = service
        .sign_up(SignUpRequest {
            name: args.name,
            email: args.email,
            password: args.password,
            password_confirmation: args.password_confirmation,
        })
        .await
        .map_err(describe)?;

    println!(
        "Created user {} <{}>; activation email sent",
        registration.user.id(),
        registration.user.email()
    );

    Ok(())
}

pub async fn activate(args: ActivateArgs, config: &AppConfig) -> anyhow::Result<()> {
    let service = crate::create_user_service(config).await?;

    match service.activate_account(&args.email, &args.token).await? {
        Some(user) => {
            println!("Account activated for {}", user.email());
            Ok(())
        }
        None => anyhow::bail!("Invalid activation link"),
    }
}

pub async fn request_reset(args: RequestResetArgs, config: &AppConfig) -> anyhow::Result<()> {
    let service = crate::create_user_service(config).await?;

    match service.request_password_reset(&args.email).await? {
        Some((user, _token)) => {
            println!("Email sent with password reset instructions to {}", user.email());
            Ok(())
        }
        None => anyhow::bail!("Email address not found"),
    }
}

pub async fn reset_password(args: ResetPasswordArgs, config: &AppConfig) -> anyhow::Result<()> {
    let service = crate::create_user_service(config).await?;

    let user = service
        .reset_password(
            &args.email,
            &args.token,
            ResetPasswordRequest {
                password: args.password,
                password_confirmation: args.password_confirmation,
            },
        )
        .await
        .map_err(describe)?;

    println!("Password has been reset for {}", user.email());

    Ok(())
}

/// Turn domain errors into operator-facing messages
fn describe(err: DomainError) -> anyhow::Error {
    match err {
        DomainError::Validation(errors) => {
            let lines: Vec<String> = errors
                .messages()
                .iter()
                .map(|m| format!("  - {}", m))
                .collect();
            anyhow::anyhow!("The form contains {} error(s):\n{}", errors.len(), lines.join("\n"))
        }
        DomainError::ResetExpired => anyhow::anyhow!("Password reset has expired"),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationErrors;

    #[test]
    fn test_describe_lists_validation_messages() {
        let mut errors = ValidationErrors::new();
        errors.push("name", "blank", "Name can't be blank");
        errors.push("email", "invalid", "Email is invalid");

        let message = describe(DomainError::Validation(errors)).to_string();

        assert!(message.contains("2 error(s)"));
        assert!(message.contains("  - Name can't be blank"));
        assert!(message.contains("  - Email is invalid"));
    }

    #[test]
    fn test_describe_passes_other_errors_through() {
        let err = DomainError::invalid_token("Password reset link is invalid");
        let message = describe(err).to_string();
        assert!(message.contains("Password reset link is invalid"));
    }

    #[tokio::test]
    async fn test_activate_with_unknown_email_fails() {
        let mut config = AppConfig::default();
        config.hashing.cost = crate::infrastructure::user::HashCost::Minimum;

        let result = activate(
            ActivateArgs {
                email: "nobody@example.com".to_string(),
                token: "token".to_string(),
            },
            &config,
        )
        .await;

        assert!(result.is_err());
    }
}
