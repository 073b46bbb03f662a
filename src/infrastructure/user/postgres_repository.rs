//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::user::{NewUser, User, UserId, UserRecord, UserRepository};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, name, email, password_digest, remember_digest, \
    activation_digest, activated, activated_at, reset_digest, reset_sent_at, \
    created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        Ok(row.map(|row| row_to_user(&row)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        Ok(row.map(|row| row_to_user(&row)))
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (name, email, password_digest, activation_digest,
                               activated, created_at, updated_at)
            VALUES ($1, $2, $3, $4, FALSE, NOW(), NOW())
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_digest)
        .bind(&user.activation_digest)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user.email, "create"))?;

        Ok(row_to_user(&row))
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_digest = $4, remember_digest = $5,
                activation_digest = $6, activated = $7, activated_at = $8,
                reset_digest = $9, reset_sent_at = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_i64())
        .bind(user.name())
        .bind(user.email())
        .bind(user.password_digest())
        .bind(user.remember_digest())
        .bind(user.activation_digest())
        .bind(user.is_activated())
        .bind(user.activated_at())
        .bind(user.reset_digest())
        .bind(user.reset_sent_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, user.email(), "update"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id()
            )));
        }

        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, offset: usize, limit: usize) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        Ok(rows.iter().map(row_to_user).collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

fn map_write_error(e: sqlx::Error, email: &str, action: &str) -> DomainError {
    if is_unique_violation(&e) {
        DomainError::email_taken(email)
    } else {
        DomainError::storage(format!("Failed to {} user: {}", action, e))
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error().is_some_and(|db| db.is_unique_violation())
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> User {
    User::from(UserRecord {
        id: UserId::new(row.get("id")),
        name: row.get("name"),
        email: row.get("email"),
        password_digest: row.get("password_digest"),
        remember_digest: row.get("remember_digest"),
        activation_digest: row.get("activation_digest"),
        activated: row.get("activated"),
        activated_at: row.get("activated_at"),
        reset_digest: row.get("reset_digest"),
        reset_sent_at: row.get("reset_sent_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
