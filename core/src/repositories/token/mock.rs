//! Mock implementation of RefreshTokenRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::RefreshToken;
use crate::errors::DomainError;

use super::r#trait::RefreshTokenRepository;

/// In-memory refresh token repository for tests, keyed by token hash.
#[derive(Default)]
pub struct MockRefreshTokenRepository {
    tokens: Arc<RwLock<HashMap<String, RefreshToken>>>,
}

impl MockRefreshTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, revoked included (test inspection).
    pub async fn count(&self) -> usize {
        self.tokens.read().await.len()
    }
}

#[async_trait]
impl RefreshTokenRepository for MockRefreshTokenRepository {
    async fn create(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tokens = self.tokens.write().await;
        // Unique constraint on token hash
        if tokens.contains_key(&token.token_hash) {
            return Err(DomainError::internal("duplicate token hash"));
        }
        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn find_valid(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .get(token_hash)
            .filter(|t| t.is_usable())
            .cloned())
    }

    async fn revoke(&self, token_hash: &str) -> Result<(), DomainError> {
        let mut tokens = self.tokens.write().await;
        if let Some(token) = tokens.get_mut(token_hash) {
            token.revoke();
        }
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let mut tokens = self.tokens.write().await;
        let mut count = 0;
        for token in tokens.values_mut() {
            if token.user_id == user_id && !token.is_revoked {
                token.revoke();
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete_consumed(&self) -> Result<u64, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| t.is_usable());
        Ok((before - tokens.len()) as u64)
    }
}
