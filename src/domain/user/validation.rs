//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::domain::error::ValidationErrors;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Name can't be blank")]
    BlankName,

    #[error("Name is too long (maximum is {0} characters)")]
    NameTooLong(usize),

    #[error("Email can't be blank")]
    BlankEmail,

    #[error("Email is too long (maximum is {0} characters)")]
    EmailTooLong(usize),

    #[error("Email is invalid")]
    InvalidEmail,

    #[error("Email has already been taken")]
    EmailTaken,

    #[error("Password can't be blank")]
    BlankPassword,

    #[error("Password is too short (minimum is {0} characters)")]
    PasswordTooShort(usize),

    #[error("Password confirmation doesn't match Password")]
    ConfirmationMismatch,
}

impl UserValidationError {
    /// Attribute the error is reported against
    pub fn field(&self) -> &'static str {
        match self {
            Self::BlankName | Self::NameTooLong(_) => "name",
            Self::BlankEmail | Self::EmailTooLong(_) | Self::InvalidEmail | Self::EmailTaken => {
                "email"
            }
            Self::BlankPassword | Self::PasswordTooShort(_) => "password",
            Self::ConfirmationMismatch => "password_confirmation",
        }
    }

    /// Rule name
    pub fn code(&self) -> &'static str {
        match self {
            Self::BlankName | Self::BlankEmail | Self::BlankPassword => "blank",
            Self::NameTooLong(_) | Self::EmailTooLong(_) => "too_long",
            Self::PasswordTooShort(_) => "too_short",
            Self::InvalidEmail => "invalid",
            Self::EmailTaken => "taken",
            Self::ConfirmationMismatch => "confirmation",
        }
    }

    /// Append this error to a collection
    pub fn record(self, errors: &mut ValidationErrors) {
        errors.push(self.field(), self.code(), self);
    }
}

pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_EMAIL_LENGTH: usize = 255;
pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9_+\-.]+@[a-z0-9\-.]+\.[a-z]+$").unwrap()
});

/// Lower-case an email address for storage and comparison
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

/// Validate a display name
///
/// Rules:
/// - Cannot be blank
/// - Maximum 50 characters
pub fn validate_name(name: &str) -> Result<(), Vec<UserValidationError>> {
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        errors.push(UserValidationError::BlankName);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        errors.push(UserValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    into_result(errors)
}

/// Validate an email address
///
/// Rules:
/// - Cannot be blank
/// - Maximum 255 characters
/// - `local@domain.tld`, ASCII word characters, `+`, `-` and `.` in the local
///   part, letters/digits/`-`/`.` in the domain, letters only in the TLD
///
/// A blank address also fails the format rule.
pub fn validate_email(email: &str) -> Result<(), Vec<UserValidationError>> {
    let mut errors = Vec::new();

    if email.trim().is_empty() {
        errors.push(UserValidationError::BlankEmail);
    }

    if email.chars().count() > MAX_EMAIL_LENGTH {
        errors.push(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if !EMAIL_PATTERN.is_match(email) {
        errors.push(UserValidationError::InvalidEmail);
    }

    into_result(errors)
}

/// Validate a password and its optional confirmation
///
/// Rules:
/// - Cannot be blank (whitespace only counts as blank)
/// - Minimum 6 characters
/// - Must equal the confirmation when one is supplied
pub fn validate_password(
    password: &str,
    confirmation: Option<&str>,
) -> Result<(), Vec<UserValidationError>> {
    let mut errors = Vec::new();

    if password.trim().is_empty() {
        errors.push(UserValidationError::BlankPassword);
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if let Some(confirmation) = confirmation {
        if confirmation != password {
            errors.push(UserValidationError::ConfirmationMismatch);
        }
    }

    into_result(errors)
}

fn into_result(errors: Vec<UserValidationError>) -> Result<(), Vec<UserValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Append every error in `result` to a collection
pub fn record_all(result: Result<(), Vec<UserValidationError>>, errors: &mut ValidationErrors) {
    if let Err(found) = result {
        for e in found {
            e.record(errors);
        }
    }
}

/// Password change carried by a save attempt
#[derive(Debug, Clone, Copy)]
pub struct PasswordInput<'a> {
    pub password: &'a str,
    pub confirmation: Option<&'a str>,
}

/// Run every attribute rule and collect all violations
///
/// `password` is `None` when the save does not change the password; the rule
/// is then skipped entirely.
pub fn validate_user(
    name: &str,
    email: &str,
    password: Option<PasswordInput<'_>>,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    record_all(validate_name(name), &mut errors);
    record_all(validate_email(email), &mut errors);

    if let Some(input) = password {
        record_all(
            validate_password(input.password, input.confirmation),
            &mut errors,
        );
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_name("Example User").is_ok());
        assert!(validate_name(&"a".repeat(50)).is_ok());
    }

    #[test]
    fn test_blank_name() {
        assert_eq!(validate_name(""), Err(vec![UserValidationError::BlankName]));
        assert_eq!(
            validate_name("     "),
            Err(vec![UserValidationError::BlankName])
        );
    }

    #[test]
    fn test_name_too_long() {
        assert_eq!(
            validate_name(&"a".repeat(51)),
            Err(vec![UserValidationError::NameTooLong(50)])
        );
    }

    #[test]
    fn test_valid_emails() {
        for email in [
            "user@example.com",
            "USER@foo.COM",
            "A_US-ER@foo.bar.org",
            "first.last@foo.jp",
            "alice+bob@baz.cn",
        ] {
            assert!(validate_email(email).is_ok(), "{email} should be valid");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "user@example,com",
            "user_at_foo.org",
            "user.name@example.",
            "foo@bar_baz.com",
            "foo@bar+baz.com",
        ] {
            assert_eq!(
                validate_email(email),
                Err(vec![UserValidationError::InvalidEmail]),
                "{email} should be invalid"
            );
        }
    }

    #[test]
    fn test_email_too_long() {
        let email = format!("{}@example.com", "a".repeat(244));
        assert_eq!(
            validate_email(&email),
            Err(vec![UserValidationError::EmailTooLong(255)])
        );
    }

    #[test]
    fn test_long_malformed_email_reports_both_rules() {
        let email = format!("{}@example", "a".repeat(250));
        assert_eq!(
            validate_email(&email),
            Err(vec![
                UserValidationError::EmailTooLong(255),
                UserValidationError::InvalidEmail
            ])
        );
    }

    #[test]
    fn test_blank_email() {
        assert_eq!(
            validate_email("   "),
            Err(vec![
                UserValidationError::BlankEmail,
                UserValidationError::InvalidEmail
            ])
        );
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("Foo@ExAMPle.CoM"), "foo@example.com");
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("foobar", None).is_ok());
        assert!(validate_password("foobar", Some("foobar")).is_ok());

        assert_eq!(
            validate_password("      ", None),
            Err(vec![UserValidationError::BlankPassword])
        );
        assert_eq!(
            validate_password("a", None),
            Err(vec![UserValidationError::PasswordTooShort(6)])
        );
        assert_eq!(
            validate_password("foobar", Some("barfoo")),
            Err(vec![UserValidationError::ConfirmationMismatch])
        );
        assert_eq!(
            validate_password("", Some("x")),
            Err(vec![
                UserValidationError::BlankPassword,
                UserValidationError::PasswordTooShort(6),
                UserValidationError::ConfirmationMismatch
            ])
        );
    }

    #[test]
    fn test_validate_user_collects_all_errors() {
        let errors = validate_user(
            "",
            "not-an-email",
            Some(PasswordInput {
                password: "abc",
                confirmation: None,
            }),
        );

        assert_eq!(errors.len(), 3);
        assert!(errors.has("name"));
        assert!(errors.has("email"));
        assert!(errors.has("password"));
    }

    #[test]
    fn test_validate_user_lists_every_rule_per_field() {
        let errors = validate_user(
            "",
            "",
            Some(PasswordInput {
                password: "",
                confirmation: None,
            }),
        );

        let codes: Vec<(&str, &str)> = errors.iter().map(|e| (e.field, e.code)).collect();
        assert_eq!(
            codes,
            vec![
                ("name", "blank"),
                ("email", "blank"),
                ("email", "invalid"),
                ("password", "blank"),
                ("password", "too_short"),
            ]
        );
    }

    #[test]
    fn test_validate_user_skips_absent_password() {
        let errors = validate_user("Ann", "ann@example.com", None);
        assert!(errors.is_empty());
    }
}
