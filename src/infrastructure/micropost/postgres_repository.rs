//! PostgreSQL micropost repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::micropost::{Micropost, MicropostId, MicropostRepository, NewMicropost};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of MicropostRepository
#[derive(Debug, Clone)]
pub struct PostgresMicropostRepository {
    pool: PgPool,
}

impl PostgresMicropostRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MicropostRepository for PostgresMicropostRepository {
    async fn create(&self, post: NewMicropost) -> Result<Micropost, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO microposts (user_id, content, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            RETURNING id, user_id, content, created_at, updated_at
            "#,
        )
        .bind(post.user_id.as_i64())
        .bind(&post.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("foreign key") {
                DomainError::not_found(format!("User '{}' not found", post.user_id))
            } else {
                DomainError::storage(format!("Failed to create micropost: {}", e))
            }
        })?;

        Ok(row_to_micropost(&row))
    }

    async fn get(&self, id: MicropostId) -> Result<Option<Micropost>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, content, created_at, updated_at
            FROM microposts
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get micropost: {}", e)))?;

        Ok(row.map(|row| row_to_micropost(&row)))
    }

    async fn delete(&self, id: MicropostId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM microposts WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete micropost: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Micropost>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, content, created_at, updated_at
            FROM microposts
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list microposts: {}", e)))?;

        Ok(rows.iter().map(row_to_micropost).collect())
    }

    async fn delete_by_user(&self, user_id: UserId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM microposts WHERE user_id = $1")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete microposts: {}", e)))?;

        Ok(result.rows_affected())
    }
}

fn row_to_micropost(row: &sqlx::postgres::PgRow) -> Micropost {
    Micropost {
        id: MicropostId::new(row.get("id")),
        user_id: UserId::new(row.get("user_id")),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
