//! Micropost entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;

/// Micropost identifier, assigned by the store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MicropostId(i64);

impl MicropostId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for MicropostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated post that has not been inserted yet
#[derive(Debug, Clone)]
pub struct NewMicropost {
    pub user_id: UserId,
    pub content: String,
}

/// Short post owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Micropost {
    pub id: MicropostId,
    pub user_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Micropost {
    pub fn inserted(id: MicropostId, post: NewMicropost, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: post.user_id,
            content: post.content,
            created_at: now,
            updated_at: now,
        }
    }
}
