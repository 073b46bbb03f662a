//! In-memory user repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{normalize_email, NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    /// Lower-cased email -> user ID
    email_index: Arc<RwLock<HashMap<String, UserId>>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            email_index: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        // Lock order is users, then email_index, everywhere
        let users = self.users.read().await;
        let email_index = self.email_index.read().await;

        Ok(email_index
            .get(&normalize_email(email))
            .and_then(|user_id| users.get(user_id).cloned()))
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        let email = normalize_email(&new_user.email);
        if email_index.contains_key(&email) {
            return Err(DomainError::email_taken(email));
        }

        let id = UserId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let user = User::inserted(id, new_user, Utc::now());

        email_index.insert(email, id);
        users.insert(id, user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        let old_email = match users.get(&user.id()) {
            Some(existing) => existing.email().to_string(),
            None => {
                return Err(DomainError::not_found(format!(
                    "User '{}' not found",
                    user.id()
                )))
            }
        };
        let new_email = user.email().to_string();

        if old_email != new_email {
            if email_index.contains_key(&new_email) {
                return Err(DomainError::email_taken(new_email));
            }

            email_index.remove(&old_email);
            email_index.insert(new_email, user.id());
        }

        users.insert(user.id(), user.clone());

        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        if let Some(user) = users.remove(&id) {
            email_index.remove(user.email());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn list(&self, offset: usize, limit: usize) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by_key(|u| u.id());

        Ok(result.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let users = self.users.read().await;
        Ok(users.len())
    }
}
