//! MySQL implementation of the VerificationCodeRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ec_core::domain::entities::VerificationCode;
use ec_core::errors::DomainError;
use ec_core::repositories::VerificationCodeRepository;

/// MySQL implementation of VerificationCodeRepository.
pub struct MySqlVerificationCodeRepository {
    pool: MySqlPool,
}

impl MySqlVerificationCodeRepository {
    /// Create a new MySQL verification code repository.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a VerificationCode entity.
    fn row_to_code(row: &sqlx::mysql::MySqlRow) -> Result<VerificationCode, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::internal(format!("failed to get id: {}", e)))?;

        Ok(VerificationCode {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::internal(format!("invalid code UUID: {}", e)))?,
            phone: row
                .try_get("phone")
                .map_err(|e| DomainError::internal(format!("failed to get phone: {}", e)))?,
            code: row
                .try_get("code")
                .map_err(|e| DomainError::internal(format!("failed to get code: {}", e)))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::internal(format!("failed to get created_at: {}", e)))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::internal(format!("failed to get expires_at: {}", e)))?,
            is_used: row
                .try_get("is_used")
                .map_err(|e| DomainError::internal(format!("failed to get is_used: {}", e)))?,
        })
    }
}

#[async_trait]
impl VerificationCodeRepository for MySqlVerificationCodeRepository {
    async fn create(&self, code: VerificationCode) -> Result<VerificationCode, DomainError> {
        let query = r#"
            INSERT INTO verification_codes (
                id, phone, code, created_at, expires_at, is_used
            ) VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(code.id.to_string())
            .bind(&code.phone)
            .bind(&code.code)
            .bind(code.created_at)
            .bind(code.expires_at)
            .bind(code.is_used)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::internal(format!("failed to create verification code: {}", e))
            })?;

        Ok(code)
    }

    async fn claim(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<Option<VerificationCode>, DomainError> {
        // Conditional update on is_used: under concurrent claims of the
        // same code MySQL serializes the row lock and only the first
        // statement reports an affected row. No read-then-write window.
        let query = r#"
            UPDATE verification_codes
            SET is_used = TRUE
            WHERE phone = ? AND code = ? AND is_used = FALSE AND expires_at > ?
            ORDER BY created_at DESC
            LIMIT 1
        "#;

        let now = Utc::now();
        let result = sqlx::query(query)
            .bind(phone)
            .bind(code)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("failed to claim code: {}", e)))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let row = sqlx::query(
            r#"
            SELECT id, phone, code, created_at, expires_at, is_used
            FROM verification_codes
            WHERE phone = ? AND code = ? AND is_used = TRUE
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(phone)
        .bind(code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::internal(format!("failed to load claimed code: {}", e)))?;

        Ok(Some(Self::row_to_code(&row)?))
    }

    async fn count_recent(&self, phone: &str, window: Duration) -> Result<u32, DomainError> {
        let cutoff = Utc::now() - window;
        let row = sqlx::query(
            "SELECT COUNT(*) AS recent FROM verification_codes WHERE phone = ? AND created_at > ?",
        )
        .bind(phone)
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::internal(format!("failed to count recent codes: {}", e)))?;

        let recent: i64 = row
            .try_get("recent")
            .map_err(|e| DomainError::internal(format!("failed to get count: {}", e)))?;
        Ok(recent as u32)
    }

    async fn delete_consumed(&self) -> Result<u64, DomainError> {
        let result =
            sqlx::query("DELETE FROM verification_codes WHERE is_used = TRUE OR expires_at < ?")
                .bind(Utc::now())
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::internal(format!("failed to delete consumed codes: {}", e))
                })?;

        Ok(result.rows_affected())
    }
}
