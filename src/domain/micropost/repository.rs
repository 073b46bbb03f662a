//! Micropost repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Micropost, MicropostId, NewMicropost};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for micropost storage
#[async_trait]
pub trait MicropostRepository: Send + Sync + Debug {
    /// Insert a new post; the store assigns the ID
    async fn create(&self, post: NewMicropost) -> Result<Micropost, DomainError>;

    /// Get a post by its ID
    async fn get(&self, id: MicropostId) -> Result<Option<Micropost>, DomainError>;

    /// Delete a single post
    async fn delete(&self, id: MicropostId) -> Result<bool, DomainError>;

    /// All posts owned by a user, newest first. Unknown users yield an empty list.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Micropost>, DomainError>;

    /// Delete every post owned by a user, returning how many were removed
    async fn delete_by_user(&self, user_id: UserId) -> Result<u64, DomainError>;
}
