//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository trait for user storage
///
/// Implementations enforce case-insensitive email uniqueness themselves and
/// report a violation as `DomainError::EmailTaken`, so two concurrent inserts
/// with the same address cannot both succeed.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by email, compared case-insensitively
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Insert a new user; the store assigns the ID
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Write every column of an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user row
    async fn delete(&self, id: UserId) -> Result<bool, DomainError>;

    /// List users ordered by ID
    async fn list(&self, offset: usize, limit: usize) -> Result<Vec<User>, DomainError>;

    /// Count all users
    async fn count(&self) -> Result<usize, DomainError>;
}
