//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ec_core::domain::entities::{User, UserRole};
use ec_core::errors::DomainError;
use ec_core::repositories::UserRepository;

/// MySQL implementation of UserRepository.
///
/// The `users.phone` column carries a unique constraint; `create` relies
/// on it rather than a racy check-then-insert.
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a User entity.
    ///
    /// Role strings are parsed through the closed enum here; an unknown
    /// value in storage is an internal error, never passed through.
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::internal(format!("failed to get id: {}", e)))?;
        let role: String = row
            .try_get("role")
            .map_err(|e| DomainError::internal(format!("failed to get role: {}", e)))?;

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::internal(format!("invalid user UUID: {}", e)))?,
            phone: row
                .try_get("phone")
                .map_err(|e| DomainError::internal(format!("failed to get phone: {}", e)))?,
            email: row
                .try_get("email")
                .map_err(|e| DomainError::internal(format!("failed to get email: {}", e)))?,
            name: row
                .try_get("name")
                .map_err(|e| DomainError::internal(format!("failed to get name: {}", e)))?,
            password_hash: row.try_get("password_hash").map_err(|e| {
                DomainError::internal(format!("failed to get password_hash: {}", e))
            })?,
            role: role
                .parse::<UserRole>()
                .map_err(|e| DomainError::internal(format!("invalid role in storage: {}", e)))?,
            is_suspended: row.try_get("is_suspended").map_err(|e| {
                DomainError::internal(format!("failed to get is_suspended: {}", e))
            })?,
            suspended_at: row.try_get::<Option<DateTime<Utc>>, _>("suspended_at").map_err(
                |e| DomainError::internal(format!("failed to get suspended_at: {}", e)),
            )?,
            suspended_reason: row.try_get("suspended_reason").map_err(|e| {
                DomainError::internal(format!("failed to get suspended_reason: {}", e))
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::internal(format!("failed to get created_at: {}", e)))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::internal(format!("failed to get updated_at: {}", e)))?,
            last_login_at: row
                .try_get::<Option<DateTime<Utc>>, _>("last_login_at")
                .map_err(|e| {
                    DomainError::internal(format!("failed to get last_login_at: {}", e))
                })?,
        })
    }
}

const USER_COLUMNS: &str = "id, phone, email, name, password_hash, role, is_suspended, \
     suspended_at, suspended_reason, created_at, updated_at, last_login_at";

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users WHERE id = ? LIMIT 1",
            USER_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("failed to find user by id: {}", e)))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users WHERE phone = ? LIMIT 1",
            USER_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("failed to find user by phone: {}", e)))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                id, phone, email, name, password_hash, role, is_suspended,
                suspended_at, suspended_reason, created_at, updated_at, last_login_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.phone)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.is_suspended)
            .bind(user.suspended_at)
            .bind(&user.suspended_reason)
            .bind(user.created_at)
            .bind(user.updated_at)
            .bind(user.last_login_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("failed to create user: {}", e)))?;

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            UPDATE users
            SET email = ?, name = ?, password_hash = ?, role = ?, is_suspended = ?,
                suspended_at = ?, suspended_reason = ?, updated_at = ?, last_login_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.is_suspended)
            .bind(user.suspended_at)
            .bind(&user.suspended_reason)
            .bind(user.updated_at)
            .bind(user.last_login_at)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("failed to update user: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::internal("user to update does not exist"));
        }

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
