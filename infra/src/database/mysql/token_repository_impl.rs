//! MySQL implementation of the RefreshTokenRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ec_core::domain::entities::RefreshToken;
use ec_core::errors::DomainError;
use ec_core::repositories::RefreshTokenRepository;

/// MySQL implementation of RefreshTokenRepository.
///
/// Rows hold SHA-256 digests only; the raw signed token never touches the
/// database. `refresh_tokens.token_hash` carries a unique constraint.
pub struct MySqlRefreshTokenRepository {
    pool: MySqlPool,
}

impl MySqlRefreshTokenRepository {
    /// Create a new MySQL refresh token repository.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a RefreshToken entity.
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<RefreshToken, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::internal(format!("failed to get id: {}", e)))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| DomainError::internal(format!("failed to get user_id: {}", e)))?;

        Ok(RefreshToken {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::internal(format!("invalid token UUID: {}", e)))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| DomainError::internal(format!("invalid user UUID: {}", e)))?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| DomainError::internal(format!("failed to get token_hash: {}", e)))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::internal(format!("failed to get created_at: {}", e)))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::internal(format!("failed to get expires_at: {}", e)))?,
            is_revoked: row
                .try_get("is_revoked")
                .map_err(|e| DomainError::internal(format!("failed to get is_revoked: {}", e)))?,
        })
    }
}

#[async_trait]
impl RefreshTokenRepository for MySqlRefreshTokenRepository {
    async fn create(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (
                id, user_id, token_hash, created_at, expires_at, is_revoked
            ) VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.user_id.to_string())
            .bind(&token.token_hash)
            .bind(token.created_at)
            .bind(token.expires_at)
            .bind(token.is_revoked)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("failed to save refresh token: {}", e)))?;

        Ok(token)
    }

    async fn find_valid(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        // Validity is evaluated against persisted state, independent of
        // any JWT claim: revoked-before-expiry tokens die here.
        let query = r#"
            SELECT id, user_id, token_hash, created_at, expires_at, is_revoked
            FROM refresh_tokens
            WHERE token_hash = ? AND is_revoked = FALSE AND expires_at > ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(token_hash)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("failed to find refresh token: {}", e)))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn revoke(&self, token_hash: &str) -> Result<(), DomainError> {
        // Idempotent by construction: zero affected rows (absent or
        // already revoked) is still success.
        sqlx::query(
            "UPDATE refresh_tokens SET is_revoked = TRUE WHERE token_hash = ? AND is_revoked = FALSE",
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::internal(format!("failed to revoke token: {}", e)))?;

        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET is_revoked = TRUE WHERE user_id = ? AND is_revoked = FALSE",
        )
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::internal(format!("failed to revoke user tokens: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn delete_consumed(&self) -> Result<u64, DomainError> {
        let result =
            sqlx::query("DELETE FROM refresh_tokens WHERE is_revoked = TRUE OR expires_at < ?")
                .bind(Utc::now())
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::internal(format!("failed to delete consumed tokens: {}", e))
                })?;

        Ok(result.rows_affected())
    }
}
