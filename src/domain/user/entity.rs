//! User entity and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::token::TokenKind;
use super::validation::normalize_email;

/// How long a password reset link stays valid after it was issued
pub const PASSWORD_RESET_TTL_HOURS: i64 = 2;

/// User identifier, assigned by the store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated user that has not been inserted yet
///
/// Built only after the password and the activation token have been hashed,
/// so there is no way to insert a user without both digests.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub activation_digest: String,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: &str,
        password_digest: impl Into<String>,
        activation_digest: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: normalize_email(email),
            password_digest: password_digest.into(),
            activation_digest: activation_digest.into(),
        }
    }
}

/// Every persisted column of a user, as read back from a store
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub remember_digest: Option<String>,
    pub activation_digest: Option<String>,
    pub activated: bool,
    pub activated_at: Option<DateTime<Utc>>,
    pub reset_digest: Option<String>,
    pub reset_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    id: UserId,
    name: String,
    /// Always lower-case
    email: String,
    #[serde(skip_serializing)]
    password_digest: String,
    #[serde(skip_serializing)]
    remember_digest: Option<String>,
    #[serde(skip_serializing)]
    activation_digest: Option<String>,
    activated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    activated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    reset_digest: Option<String>,
    #[serde(skip_serializing)]
    reset_sent_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: normalize_email(&record.email),
            password_digest: record.password_digest,
            remember_digest: record.remember_digest,
            activation_digest: record.activation_digest,
            activated: record.activated,
            activated_at: record.activated_at,
            reset_digest: record.reset_digest,
            reset_sent_at: record.reset_sent_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl User {
    /// Materialize a freshly inserted user
    pub fn inserted(id: UserId, new_user: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new_user.name,
            email: normalize_email(&new_user.email),
            password_digest: new_user.password_digest,
            remember_digest: None,
            activation_digest: Some(new_user.activation_digest),
            activated: false,
            activated_at: None,
            reset_digest: None,
            reset_sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    // Getters

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_digest(&self) -> &str {
        &self.password_digest
    }

    pub fn remember_digest(&self) -> Option<&str> {
        self.remember_digest.as_deref()
    }

    pub fn activation_digest(&self) -> Option<&str> {
        self.activation_digest.as_deref()
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn activated_at(&self) -> Option<DateTime<Utc>> {
        self.activated_at
    }

    pub fn reset_digest(&self) -> Option<&str> {
        self.reset_digest.as_deref()
    }

    pub fn reset_sent_at(&self) -> Option<DateTime<Utc>> {
        self.reset_sent_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Digest a token of the given kind is checked against
    pub fn digest_for(&self, kind: TokenKind) -> Option<&str> {
        match kind {
            TokenKind::Remember => self.remember_digest(),
            TokenKind::Activation => self.activation_digest(),
            TokenKind::Reset => self.reset_digest(),
        }
    }

    /// Whether the reset link issued at `reset_sent_at` is older than two
    /// hours as of `now`. A user with no outstanding reset counts as expired.
    pub fn password_reset_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.reset_sent_at {
            Some(sent_at) => sent_at < now - Duration::hours(PASSWORD_RESET_TTL_HOURS),
            None => true,
        }
    }

    pub fn password_reset_expired(&self) -> bool {
        self.password_reset_expired_at(Utc::now())
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Stored lower-cased
    pub fn set_email(&mut self, email: &str) {
        self.email = normalize_email(email);
        self.touch();
    }

    pub fn set_password_digest(&mut self, digest: impl Into<String>) {
        self.password_digest = digest.into();
        self.touch();
    }

    pub fn set_remember_digest(&mut self, digest: Option<String>) {
        self.remember_digest = digest;
        self.touch();
    }

    pub fn mark_activated(&mut self, at: DateTime<Utc>) {
        self.activated = true;
        self.activated_at = Some(at);
        self.touch();
    }

    pub fn set_reset_digest(&mut self, digest: impl Into<String>, sent_at: DateTime<Utc>) {
        self.reset_digest = Some(digest.into());
        self.reset_sent_at = Some(sent_at);
        self.touch();
    }

    pub fn clear_reset_digest(&mut self) {
        self.reset_digest = None;
        self.reset_sent_at = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        let new_user =
            NewUser::new("Ann", "Ann@Example.COM", "password_digest", "activation_digest");
        User::inserted(UserId::new(1), new_user, Utc::now())
    }

    #[test]
    fn test_new_user_lowercases_email() {
        let new_user = NewUser::new("Ann", "Ann@Example.COM", "pd", "ad");
        assert_eq!(new_user.email, "ann@example.com");
    }

    #[test]
    fn test_inserted_defaults() {
        let user = create_test_user();

        assert_eq!(user.id(), UserId::new(1));
        assert_eq!(user.email(), "ann@example.com");
        assert!(!user.is_activated());
        assert!(user.activated_at().is_none());
        assert!(user.remember_digest().is_none());
        assert_eq!(user.activation_digest(), Some("activation_digest"));
        assert!(user.reset_digest().is_none());
    }

    #[test]
    fn test_digest_for_maps_each_kind() {
        let mut user = create_test_user();
        user.set_remember_digest(Some("rd".to_string()));
        user.set_reset_digest("xd", Utc::now());

        assert_eq!(user.digest_for(TokenKind::Remember), Some("rd"));
        assert_eq!(user.digest_for(TokenKind::Activation), Some("activation_digest"));
        assert_eq!(user.digest_for(TokenKind::Reset), Some("xd"));
    }

    #[test]
    fn test_set_email_lowercases() {
        let mut user = create_test_user();
        user.set_email("NEW@Example.org");
        assert_eq!(user.email(), "new@example.org");
    }

    #[test]
    fn test_mark_activated() {
        let mut user = create_test_user();
        let at = Utc::now();

        user.mark_activated(at);

        assert!(user.is_activated());
        assert_eq!(user.activated_at(), Some(at));
    }

    #[test]
    fn test_password_reset_expiry_window() {
        let mut user = create_test_user();
        let issued = Utc::now();
        user.set_reset_digest("xd", issued);

        let two_hours = Duration::hours(2);
        let epsilon = Duration::seconds(1);

        assert!(!user.password_reset_expired_at(issued));
        assert!(!user.password_reset_expired_at(issued + two_hours - epsilon));
        assert!(user.password_reset_expired_at(issued + two_hours + epsilon));
    }

    #[test]
    fn test_password_reset_without_issue_counts_as_expired() {
        let user = create_test_user();
        assert!(user.password_reset_expired());
    }

    #[test]
    fn test_clear_reset_digest() {
        let mut user = create_test_user();
        user.set_reset_digest("xd", Utc::now());

        user.clear_reset_digest();

        assert!(user.reset_digest().is_none());
        assert!(user.reset_sent_at().is_none());
    }

    #[test]
    fn test_serialization_excludes_digests() {
        let mut user = create_test_user();
        user.set_remember_digest(Some("remember_secret".to_string()));

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_digest"));
        assert!(!json.contains("activation_digest"));
        assert!(!json.contains("remember_secret"));
        assert!(json.contains("ann@example.com"));
    }

    #[test]
    fn test_from_record_round_trip() {
        let now = Utc::now();
        let record = UserRecord {
            id: UserId::new(42),
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            password_digest: "pd".to_string(),
            remember_digest: None,
            activation_digest: Some("ad".to_string()),
            activated: true,
            activated_at: Some(now),
            reset_digest: None,
            reset_sent_at: None,
            created_at: now,
            updated_at: now,
        };

        let user = User::from(record);
        assert_eq!(user.id().as_i64(), 42);
        assert!(user.is_activated());
        assert_eq!(user.activated_at(), Some(now));
    }
}
