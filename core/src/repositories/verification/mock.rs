//! Mock implementation of VerificationCodeRepository for testing

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::VerificationCode;
use crate::errors::DomainError;

use super::r#trait::VerificationCodeRepository;

/// In-memory verification code repository for tests.
///
/// The claim path holds the write lock across find-and-mark, matching the
/// at-most-one-success guarantee of the SQL conditional update.
#[derive(Default)]
pub struct MockVerificationCodeRepository {
    codes: Arc<RwLock<Vec<VerificationCode>>>,
}

impl MockVerificationCodeRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a code row directly, bypassing `create`.
    pub async fn insert_raw(&self, code: VerificationCode) {
        self.codes.write().await.push(code);
    }

    /// Most recently issued code for a phone, if any (test inspection).
    pub async fn last_code_for(&self, phone: &str) -> Option<String> {
        let codes = self.codes.read().await;
        codes
            .iter()
            .filter(|c| c.phone == phone)
            .max_by_key(|c| c.created_at)
            .map(|c| c.code.clone())
    }
}

#[async_trait]
impl VerificationCodeRepository for MockVerificationCodeRepository {
    async fn create(&self, code: VerificationCode) -> Result<VerificationCode, DomainError> {
        let mut codes = self.codes.write().await;
        codes.push(code.clone());
        Ok(code)
    }

    async fn claim(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<Option<VerificationCode>, DomainError> {
        let mut codes = self.codes.write().await;
        let candidate = codes
            .iter_mut()
            .filter(|c| c.phone == phone && c.code == code && c.is_claimable())
            .max_by_key(|c| c.created_at);

        match candidate {
            Some(row) => {
                row.mark_used();
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn count_recent(&self, phone: &str, window: Duration) -> Result<u32, DomainError> {
        let cutoff = Utc::now() - window;
        let codes = self.codes.read().await;
        Ok(codes
            .iter()
            .filter(|c| c.phone == phone && c.created_at > cutoff)
            .count() as u32)
    }

    async fn delete_consumed(&self) -> Result<u64, DomainError> {
        let mut codes = self.codes.write().await;
        let before = codes.len();
        codes.retain(|c| c.is_claimable());
        Ok((before - codes.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn claim_consumes_exactly_once() {
        let repo = MockVerificationCodeRepository::new();
        let code = VerificationCode::new("13800138000".to_string());
        let digits = code.code.clone();
        repo.create(code).await.unwrap();

        assert!(repo.claim("13800138000", &digits).await.unwrap().is_some());
        assert!(repo.claim("13800138000", &digits).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn claim_prefers_most_recent_row() {
        let repo = MockVerificationCodeRepository::new();
        let mut old = VerificationCode::new("13800138000".to_string());
        old.code = "111111".to_string();
        old.created_at = Utc::now() - Duration::seconds(30);
        let mut new = VerificationCode::new("13800138000".to_string());
        new.code = "111111".to_string();

        let new_id = new.id;
        repo.insert_raw(old).await;
        repo.insert_raw(new).await;

        let claimed = repo.claim("13800138000", "111111").await.unwrap().unwrap();
        assert_eq!(claimed.id, new_id);
    }

    #[tokio::test]
    async fn cleanup_removes_used_and_expired() {
        let repo = MockVerificationCodeRepository::new();
        let mut used = VerificationCode::new("13800138000".to_string());
        used.mark_used();
        let mut expired = VerificationCode::new("13800138001".to_string());
        expired.expires_at = Utc::now() - Duration::seconds(1);
        let fresh = VerificationCode::new("13800138002".to_string());

        repo.insert_raw(used).await;
        repo.insert_raw(expired).await;
        repo.insert_raw(fresh).await;

        assert_eq!(repo.delete_consumed().await.unwrap(), 2);
    }
}
