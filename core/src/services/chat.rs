//! Chat message gating.
//!
//! The completion backend is an opaque collaborator; this service owns
//! only the authorization-adjacent concerns: both chat rate limit tiers
//! must pass before a message reaches the upstream model.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use tracing::warn;

use crate::errors::{AuthError, DomainError, DomainResult};
use crate::services::rate_limit::{RateDecision, RateLimiter, RateQuota};

/// Per-user chat quotas; both tiers are checked on every send.
const CHAT_MINUTE_QUOTA: RateQuota = RateQuota::per_minute(10);
const CHAT_HOUR_QUOTA: RateQuota = RateQuota::per_hour(120);

/// A single message in a conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Failure modes of the completion backend.
#[derive(Error, Debug)]
pub enum ChatDispatchError {
    #[error("request rejected by provider: {reason}")]
    Rejected { reason: String },

    #[error("provider unavailable: {detail}")]
    Unavailable { detail: String },
}

/// Opaque LLM completion backend.
///
/// Implementations must enforce an explicit request timeout.
#[async_trait]
pub trait ChatCompletionClient: Send + Sync {
    /// Produce a completion for the given conversation history.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatDispatchError>;
}

/// Gates chat sends behind per-minute and per-hour quotas.
pub struct ChatService<R, C>
where
    R: RateLimiter,
    C: ChatCompletionClient,
{
    rate_limiter: Arc<R>,
    client: Arc<C>,
}

impl<R, C> ChatService<R, C>
where
    R: RateLimiter,
    C: ChatCompletionClient,
{
    /// Create a new chat service.
    pub fn new(rate_limiter: Arc<R>, client: Arc<C>) -> Self {
        Self {
            rate_limiter,
            client,
        }
    }

    /// Send a conversation to the completion backend on behalf of a user.
    pub async fn send_message(
        &self,
        user_id: Uuid,
        messages: &[ChatMessage],
    ) -> DomainResult<String> {
        let subject = user_id.to_string();
        for (scope, quota) in [
            ("chat-minute", CHAT_MINUTE_QUOTA),
            ("chat-hour", CHAT_HOUR_QUOTA),
        ] {
            if let RateDecision::Limited { retry_after_secs } =
                self.rate_limiter.check(scope, &subject, quota).await
            {
                return Err(AuthError::RateLimitExceeded { retry_after_secs }.into());
            }
        }

        self.client.complete(messages).await.map_err(|e| {
            // Provider detail stays in the server log
            warn!(user_id = %user_id, error = %e, "chat completion failed");
            DomainError::internal("chat completion backend failure")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct StubClient {
        reply: String,
    }

    #[async_trait]
    impl ChatCompletionClient for StubClient {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, ChatDispatchError> {
            Ok(self.reply.clone())
        }
    }

    struct FailingClient;

    #[async_trait]
    impl ChatCompletionClient for FailingClient {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, ChatDispatchError> {
            Err(ChatDispatchError::Unavailable {
                detail: "upstream 503".to_string(),
            })
        }
    }

    /// Limits a single named scope, allows everything else.
    struct ScopedLimiter {
        limited_scope: &'static str,
        checks: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RateLimiter for ScopedLimiter {
        async fn check(&self, scope: &str, _subject: &str, _quota: RateQuota) -> RateDecision {
            self.checks.lock().unwrap().push(scope.to_string());
            if scope == self.limited_scope {
                RateDecision::Limited {
                    retry_after_secs: 42,
                }
            } else {
                RateDecision::Allowed
            }
        }
    }

    fn messages() -> Vec<ChatMessage> {
        vec![ChatMessage {
            role: "user".to_string(),
            content: "hello".to_string(),
        }]
    }

    #[tokio::test]
    async fn both_tiers_are_checked_before_dispatch() {
        let limiter = Arc::new(ScopedLimiter {
            limited_scope: "",
            checks: Mutex::new(Vec::new()),
        });
        let service = ChatService::new(
            Arc::clone(&limiter),
            Arc::new(StubClient {
                reply: "hi".to_string(),
            }),
        );
        let user_id = Uuid::new_v4();

        let reply = service.send_message(user_id, &messages()).await.unwrap();
        assert_eq!(reply, "hi");
        assert_eq!(
            *limiter.checks.lock().unwrap(),
            vec!["chat-minute".to_string(), "chat-hour".to_string()]
        );
    }

    #[tokio::test]
    async fn hour_tier_alone_blocks_the_send() {
        let limiter = Arc::new(ScopedLimiter {
            limited_scope: "chat-hour",
            checks: Mutex::new(Vec::new()),
        });
        let service = ChatService::new(
            limiter,
            Arc::new(StubClient {
                reply: "hi".to_string(),
            }),
        );
        let result = service.send_message(Uuid::new_v4(), &messages()).await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::RateLimitExceeded {
                retry_after_secs: 42
            }))
        ));
    }

    #[tokio::test]
    async fn backend_failure_is_masked() {
        let limiter = Arc::new(ScopedLimiter {
            limited_scope: "",
            checks: Mutex::new(Vec::new()),
        });
        let service = ChatService::new(limiter, Arc::new(FailingClient));

        let err = service
            .send_message(Uuid::new_v4(), &messages())
            .await
            .unwrap_err();
        assert!(!err.to_string().contains("503"));
    }
}
