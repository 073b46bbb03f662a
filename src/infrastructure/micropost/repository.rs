//! In-memory micropost repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::micropost::{Micropost, MicropostId, MicropostRepository, NewMicropost};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of MicropostRepository
#[derive(Debug)]
pub struct InMemoryMicropostRepository {
    posts: Arc<RwLock<HashMap<MicropostId, Micropost>>>,
    next_id: AtomicI64,
}

impl InMemoryMicropostRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            posts: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryMicropostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MicropostRepository for InMemoryMicropostRepository {
    async fn create(&self, post: NewMicropost) -> Result<Micropost, DomainError> {
        let mut posts = self.posts.write().await;

        let id = MicropostId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let micropost = Micropost::inserted(id, post, Utc::now());
        posts.insert(id, micropost.clone());

        Ok(micropost)
    }

    async fn get(&self, id: MicropostId) -> Result<Option<Micropost>, DomainError> {
        let posts = self.posts.read().await;
        Ok(posts.get(&id).cloned())
    }

    async fn delete(&self, id: MicropostId) -> Result<bool, DomainError> {
        let mut posts = self.posts.write().await;
        Ok(posts.remove(&id).is_some())
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Micropost>, DomainError> {
        let posts = self.posts.read().await;

        let mut result: Vec<Micropost> = posts
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        // IDs break ties between posts created in the same instant
        result.sort_by_key(|p| Reverse((p.created_at, p.id)));

        Ok(result)
    }

    async fn delete_by_user(&self, user_id: UserId) -> Result<u64, DomainError> {
        let mut posts = self.posts.write().await;

        let before = posts.len();
        posts.retain(|_, p| p.user_id != user_id);

        Ok((before - posts.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(user_id: i64, content: &str) -> NewMicropost {
        NewMicropost {
            user_id: UserId::new(user_id),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryMicropostRepository::new();

        let created = repo.create(post(1, "Hello")).await.unwrap();
        assert_eq!(created.id, MicropostId::new(1));

        let retrieved = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(retrieved.content, "Hello");
        assert_eq!(retrieved.user_id, UserId::new(1));
    }

    #[tokio::test]
    async fn test_list_by_user_newest_first() {
        let repo = InMemoryMicropostRepository::new();
        repo.create(post(1, "first")).await.unwrap();
        repo.create(post(2, "someone else")).await.unwrap();
        repo.create(post(1, "second")).await.unwrap();
        repo.create(post(1, "third")).await.unwrap();

        let posts = repo.list_by_user(UserId::new(1)).await.unwrap();
        let contents: Vec<&str> = posts.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_list_by_unknown_user_is_empty() {
        let repo = InMemoryMicropostRepository::new();
        assert!(repo.list_by_user(UserId::new(42)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryMicropostRepository::new();
        let created = repo.create(post(1, "Hello")).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.get(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_by_user_keeps_other_posts() {
        let repo = InMemoryMicropostRepository::new();
        repo.create(post(1, "a")).await.unwrap();
        repo.create(post(1, "b")).await.unwrap();
        repo.create(post(2, "c")).await.unwrap();

        assert_eq!(repo.delete_by_user(UserId::new(1)).await.unwrap(), 2);
        assert!(repo.list_by_user(UserId::new(1)).await.unwrap().is_empty());
        assert_eq!(repo.list_by_user(UserId::new(2)).await.unwrap().len(), 1);
    }
}
