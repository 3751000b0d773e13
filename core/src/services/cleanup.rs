//! Periodic cleanup of consumed verification codes and refresh tokens.
//!
//! Decoupled from request handling: sweeps run on their own interval and
//! log failures without ever surfacing them to clients. Skipping the
//! sweep is not a correctness problem, only unbounded table growth.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::repositories::{RefreshTokenRepository, VerificationCodeRepository};

/// Configuration for the cleanup task.
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often to run a sweep
    pub interval: Duration,
    /// Whether the task is enabled
    pub enabled: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
            enabled: true,
        }
    }
}

/// Summary of one sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub codes_deleted: u64,
    pub tokens_deleted: u64,
}

/// Periodic sweeper over verification codes and refresh tokens.
pub struct CleanupTask<V, T>
where
    V: VerificationCodeRepository,
    T: RefreshTokenRepository,
{
    codes: Arc<V>,
    tokens: Arc<T>,
    config: CleanupConfig,
}

impl<V, T> CleanupTask<V, T>
where
    V: VerificationCodeRepository + 'static,
    T: RefreshTokenRepository + 'static,
{
    /// Create a new cleanup task.
    pub fn new(codes: Arc<V>, tokens: Arc<T>, config: CleanupConfig) -> Self {
        Self {
            codes,
            tokens,
            config,
        }
    }

    /// Run a single sweep. Each store is swept independently; a failure in
    /// one does not skip the other.
    pub async fn run_once(&self) -> CleanupReport {
        let mut report = CleanupReport::default();

        match self.codes.delete_consumed().await {
            Ok(count) => report.codes_deleted = count,
            Err(e) => error!(error = %e, "verification code sweep failed"),
        }

        match self.tokens.delete_consumed().await {
            Ok(count) => report.tokens_deleted = count,
            Err(e) => error!(error = %e, "refresh token sweep failed"),
        }

        if report.codes_deleted > 0 || report.tokens_deleted > 0 {
            info!(
                codes = report.codes_deleted,
                tokens = report.tokens_deleted,
                "cleanup sweep finished"
            );
        }
        report
    }

    /// Run sweeps forever on the configured interval. Intended to be
    /// spawned as a background task at startup.
    pub async fn run(self) {
        if !self.config.enabled {
            info!("cleanup task disabled");
            return;
        }

        let mut ticker = tokio::time::interval(self.config.interval);
        // The first tick fires immediately; skip it so startup is not
        // serialized behind a sweep.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.run_once().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::token::hash_token;
    use crate::domain::entities::{RefreshToken, VerificationCode};
    use crate::repositories::{
        MockRefreshTokenRepository, MockVerificationCodeRepository, RefreshTokenRepository,
    };
    use chrono::Utc;
    use uuid::Uuid;

    #[tokio::test]
    async fn sweep_reports_deleted_rows() {
        let codes = Arc::new(MockVerificationCodeRepository::new());
        let tokens = Arc::new(MockRefreshTokenRepository::new());

        let mut used = VerificationCode::new("13800138000".to_string());
        used.mark_used();
        codes.insert_raw(used).await;
        codes
            .insert_raw(VerificationCode::new("13900139000".to_string()))
            .await;

        let mut revoked = RefreshToken::new(
            Uuid::new_v4(),
            hash_token("stale"),
            Utc::now() + chrono::Duration::days(30),
        );
        revoked.revoke();
        tokens.create(revoked).await.unwrap();

        let task = CleanupTask::new(codes, tokens, CleanupConfig::default());
        let report = task.run_once().await;

        assert_eq!(report.codes_deleted, 1);
        assert_eq!(report.tokens_deleted, 1);
    }

    #[tokio::test]
    async fn empty_sweep_is_a_noop() {
        let task = CleanupTask::new(
            Arc::new(MockVerificationCodeRepository::new()),
            Arc::new(MockRefreshTokenRepository::new()),
            CleanupConfig::default(),
        );
        assert_eq!(task.run_once().await, CleanupReport::default());
    }
}
