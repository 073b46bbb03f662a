//! User service for sign-up, login tokens, activation and password reset

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::micropost::{
    validate_content, Micropost, MicropostId, MicropostRepository, NewMicropost,
};
use crate::domain::user::{
    normalize_email, record_all, validate_password, validate_user, ActivationToken, NewUser,
    PasswordInput,
    RememberToken, ResetToken, TokenKind, User, UserId, UserRepository, UserValidationError,
};
use crate::domain::{DomainError, ValidationErrors};
use crate::infrastructure::mail::UserMailer;

use super::password::DigestHasher;
use super::token::{TokenGenerator, UrlSafeTokenGenerator};

/// Users shown per page by `list`
pub const USERS_PER_PAGE: usize = 30;

/// Request for creating a new account
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: Option<String>,
}

/// Request for editing an account
///
/// A `None` or blank password leaves the current password unchanged.
#[derive(Debug, Clone)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

/// New password submitted through a reset link
#[derive(Debug, Clone)]
pub struct ResetPasswordRequest {
    pub password: String,
    pub password_confirmation: Option<String>,
}

/// Result of a successful sign-up
///
/// The activation token exists only here and in the email sent to the user.
#[derive(Debug, Clone)]
pub struct Registration {
    pub user: User,
    pub activation_token: ActivationToken,
}

/// Account service
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    microposts: Arc<dyn MicropostRepository>,
    hasher: Arc<dyn DigestHasher>,
    tokens: Arc<dyn TokenGenerator>,
    mailer: UserMailer,
}

impl UserService {
    /// Create a new user service
    pub fn new(
        users: Arc<dyn UserRepository>,
        microposts: Arc<dyn MicropostRepository>,
        hasher: Arc<dyn DigestHasher>,
        mailer: UserMailer,
    ) -> Self {
        Self {
            users,
            microposts,
            hasher,
            tokens: Arc::new(UrlSafeTokenGenerator::new()),
            mailer,
        }
    }

    /// Replace the token source
    pub fn with_token_generator(mut self, tokens: Arc<dyn TokenGenerator>) -> Self {
        self.tokens = tokens;
        self
    }

    // Digests and tokens

    /// Hash a secret with the configured cost
    pub fn digest(&self, plaintext: &str) -> Result<String, DomainError> {
        self.hasher.hash(plaintext)
    }

    /// A fresh random URL-safe token
    pub fn new_token(&self) -> String {
        self.tokens.generate()
    }

    /// Check a token against the digest of the given kind
    ///
    /// A missing or malformed digest never authenticates.
    pub fn authenticated(&self, user: &User, kind: TokenKind, token: &str) -> bool {
        match user.digest_for(kind) {
            Some(digest) => self.hasher.verify(token, digest),
            None => false,
        }
    }

    // Sign-up and login

    /// Create an account and send its activation email
    ///
    /// Every violated rule is reported at once; nothing is stored when any fail.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<Registration, DomainError> {
        let email = normalize_email(&request.email);

        let mut errors = validate_user(
            &request.name,
            &email,
            Some(PasswordInput {
                password: &request.password,
                confirmation: request.password_confirmation.as_deref(),
            }),
        );
        self.check_email_available(&email, None, &mut errors).await?;
        errors.into_result()?;

        let activation_token = ActivationToken::new(self.new_token());
        let password_digest = self.digest(&request.password)?;
        let activation_digest = self.digest(activation_token.as_str())?;

        let user = self
            .users
            .create(NewUser::new(
                request.name,
                &email,
                password_digest,
                activation_digest,
            ))
            .await?;

        info!(user_id = %user.id(), "User signed up");

        self.send_activation_email(&user, &activation_token).await?;

        Ok(Registration {
            user,
            activation_token,
        })
    }

    /// Log in with email and password
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let user = match self.users.find_by_email(email).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        if !self.hasher.verify(password, user.password_digest()) {
            debug!(user_id = %user.id(), "Password did not match");
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Start a persistent session; the returned token goes into a cookie
    ///
    /// `user` only changes once the store accepts the write.
    pub async fn remember(&self, user: &mut User) -> Result<RememberToken, DomainError> {
        let token = RememberToken::new(self.new_token());

        let mut updated = user.clone();
        updated.set_remember_digest(Some(self.digest(token.as_str())?));

        *user = self.users.update(&updated).await?;
        debug!(user_id = %user.id(), "Remember digest stored");

        Ok(token)
    }

    /// End a persistent session
    pub async fn forget(&self, user: &mut User) -> Result<(), DomainError> {
        let mut updated = user.clone();
        updated.set_remember_digest(None);

        *user = self.users.update(&updated).await?;

        Ok(())
    }

    // Activation

    pub async fn activate(&self, user: &mut User) -> Result<(), DomainError> {
        let mut updated = user.clone();
        updated.mark_activated(Utc::now());

        *user = self.users.update(&updated).await?;

        info!(user_id = %user.id(), "User activated");
        Ok(())
    }

    /// Follow an activation link
    ///
    /// Returns the activated user, or `None` when the user is unknown, already
    /// active or the token does not match.
    pub async fn activate_account(
        &self,
        email: &str,
        token: &str,
    ) -> Result<Option<User>, DomainError> {
        let mut user = match self.users.find_by_email(email).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        if user.is_activated() || !self.authenticated(&user, TokenKind::Activation, token) {
            warn!(user_id = %user.id(), "Invalid activation link");
            return Ok(None);
        }

        self.activate(&mut user).await?;
        Ok(Some(user))
    }

    pub async fn send_activation_email(
        &self,
        user: &User,
        token: &ActivationToken,
    ) -> Result<(), DomainError> {
        self.mailer.send_account_activation(user, token).await?;
        debug!(user_id = %user.id(), "Activation email sent");
        Ok(())
    }

    // Password reset

    /// Issue a reset token, storing its digest and the issue time
    pub async fn create_reset_digest(&self, user: &mut User) -> Result<ResetToken, DomainError> {
        let token = ResetToken::new(self.new_token());

        let mut updated = user.clone();
        updated.set_reset_digest(self.digest(token.as_str())?, Utc::now());

        *user = self.users.update(&updated).await?;

        Ok(token)
    }

    pub async fn send_password_reset_email(
        &self,
        user: &User,
        token: &ResetToken,
    ) -> Result<(), DomainError> {
        self.mailer.send_password_reset(user, token).await?;
        debug!(user_id = %user.id(), "Password reset email sent");
        Ok(())
    }

    /// Issue a reset token and email the link. Unknown addresses yield `None`.
    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<Option<(User, ResetToken)>, DomainError> {
        let mut user = match self.users.find_by_email(email).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        let token = self.create_reset_digest(&mut user).await?;
        self.send_password_reset_email(&user, &token).await?;

        info!(user_id = %user.id(), "Password reset requested");
        Ok(Some((user, token)))
    }

    pub fn password_reset_expired(&self, user: &User) -> bool {
        user.password_reset_expired()
    }

    /// Set a new password through a reset link
    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        request: ResetPasswordRequest,
    ) -> Result<User, DomainError> {
        let mut user = self
            .users
            .find_by_email(email)
            .await?
            .filter(|u| u.is_activated() && self.authenticated(u, TokenKind::Reset, token))
            .ok_or_else(|| DomainError::invalid_token("Password reset link is invalid"))?;

        if self.password_reset_expired(&user) {
            return Err(DomainError::ResetExpired);
        }

        let mut errors = ValidationErrors::new();
        record_all(
            validate_password(&request.password, request.password_confirmation.as_deref()),
            &mut errors,
        );
        errors.into_result()?;

        user.set_password_digest(self.digest(&request.password)?);
        user.clear_reset_digest();

        let user = self.users.update(&user).await?;
        info!(user_id = %user.id(), "Password has been reset");

        Ok(user)
    }

    // Profile

    /// Change name and email, and the password when one is given
    pub async fn update_profile(
        &self,
        user: &mut User,
        request: UpdateProfileRequest,
    ) -> Result<(), DomainError> {
        let email = normalize_email(&request.email);
        let new_password = request.password.as_deref().filter(|p| !p.is_empty());

        let mut errors = validate_user(
            &request.name,
            &email,
            new_password.map(|password| PasswordInput {
                password,
                confirmation: request.password_confirmation.as_deref(),
            }),
        );
        self.check_email_available(&email, Some(user.id()), &mut errors)
            .await?;
        errors.into_result()?;

        let mut updated = user.clone();
        updated.set_name(request.name);
        updated.set_email(&email);
        if let Some(password) = new_password {
            updated.set_password_digest(self.digest(password)?);
        }

        *user = self.users.update(&updated).await?;
        info!(user_id = %user.id(), "Profile updated");

        Ok(())
    }

    // Lookup

    pub async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        self.users.get(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.users.find_by_email(email).await
    }

    /// One page of users in ID order; pages start at 1
    pub async fn list(&self, page: usize) -> Result<Vec<User>, DomainError> {
        let offset = page.saturating_sub(1) * USERS_PER_PAGE;
        self.users.list(offset, USERS_PER_PAGE).await
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.users.count().await
    }

    /// Delete a user together with every post it owns
    ///
    /// The user row goes first, so a failed or missing delete leaves the posts
    /// in place. Postgres removes the posts in the same statement through the
    /// foreign key cascade; the sweep afterwards covers stores without one.
    pub async fn destroy(&self, id: UserId) -> Result<bool, DomainError> {
        if !self.users.delete(id).await? {
            return Ok(false);
        }

        let removed_posts = self.microposts.delete_by_user(id).await?;
        info!(user_id = %id, removed_posts, "User destroyed");

        Ok(true)
    }

    // Microposts

    /// Posts owned by the user, newest first
    pub async fn feed(&self, user_id: UserId) -> Result<Vec<Micropost>, DomainError> {
        self.microposts.list_by_user(user_id).await
    }

    pub async fn post(&self, user_id: UserId, content: &str) -> Result<Micropost, DomainError> {
        if let Err(e) = validate_content(content) {
            return Err(DomainError::invalid("content", e.code(), e));
        }

        if self.users.get(user_id).await?.is_none() {
            return Err(DomainError::not_found(format!("User '{}' not found", user_id)));
        }

        self.microposts
            .create(NewMicropost {
                user_id,
                content: content.to_string(),
            })
            .await
    }

    /// Delete a post on behalf of `user_id`
    ///
    /// Returns `false` when the post does not exist or belongs to someone else.
    pub async fn delete_post(
        &self,
        user_id: UserId,
        id: MicropostId,
    ) -> Result<bool, DomainError> {
        match self.microposts.get(id).await? {
            Some(post) if post.user_id == user_id => self.microposts.delete(id).await,
            Some(_) => {
                warn!(user_id = %user_id, post_id = %id, "Post belongs to another user");
                Ok(false)
            }
            None => Ok(false),
        }
    }

    /// Record a "taken" error unless the address is free or already belongs to `owner`
    async fn check_email_available(
        &self,
        email: &str,
        owner: Option<UserId>,
        errors: &mut ValidationErrors,
    ) -> Result<(), DomainError> {
        if errors.has("email") {
            return Ok(());
        }

        if let Some(existing) = self.users.find_by_email(email).await? {
            if Some(existing.id()) != owner {
                UserValidationError::EmailTaken.record(errors);
            }
        }

        Ok(())
    }
}
