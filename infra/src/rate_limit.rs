//! MySQL-backed fixed-window rate limiter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use tracing::warn;

use ec_core::services::rate_limit::{RateDecision, RateLimiter, RateQuota};

/// Fixed-window counter stored in `rate_limit_counters`, one row per
/// `(scope, subject)`.
///
/// Counter state lives in the shared relational store so the limit holds
/// across all server instances. Storage errors fail OPEN: the check
/// allows the request and logs a warning, because a limiter outage must
/// not block legitimate traffic.
pub struct MySqlRateLimiter {
    pool: MySqlPool,
}

impl MySqlRateLimiter {
    /// Create a new MySQL rate limiter.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn check_inner(
        &self,
        scope: &str,
        subject: &str,
        quota: RateQuota,
    ) -> Result<RateDecision, sqlx::Error> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Lock the counter row for the duration of the decision so
        // concurrent checks for the same subject serialize.
        let row = sqlx::query(
            r#"
            SELECT window_started_at, count
            FROM rate_limit_counters
            WHERE scope = ? AND subject = ?
            FOR UPDATE
            "#,
        )
        .bind(scope)
        .bind(subject)
        .fetch_optional(&mut *tx)
        .await?;

        let decision = match row {
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO rate_limit_counters
                        (scope, subject, window_started_at, count, last_request_at)
                    VALUES (?, ?, ?, 1, ?)
                    "#,
                )
                .bind(scope)
                .bind(subject)
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await?;
                RateDecision::Allowed
            }
            Some(row) => {
                let window_started_at: DateTime<Utc> = row.try_get("window_started_at")?;
                let count: u32 = row.try_get::<i64, _>("count")? as u32;

                match decide(window_started_at, count, now, quota) {
                    WindowAction::Reset => {
                        sqlx::query(
                            r#"
                            UPDATE rate_limit_counters
                            SET window_started_at = ?, count = 1, last_request_at = ?
                            WHERE scope = ? AND subject = ?
                            "#,
                        )
                        .bind(now)
                        .bind(now)
                        .bind(scope)
                        .bind(subject)
                        .execute(&mut *tx)
                        .await?;
                        RateDecision::Allowed
                    }
                    WindowAction::Increment => {
                        sqlx::query(
                            r#"
                            UPDATE rate_limit_counters
                            SET count = count + 1, last_request_at = ?
                            WHERE scope = ? AND subject = ?
                            "#,
                        )
                        .bind(now)
                        .bind(scope)
                        .bind(subject)
                        .execute(&mut *tx)
                        .await?;
                        RateDecision::Allowed
                    }
                    WindowAction::Reject { retry_after_secs } => {
                        RateDecision::Limited { retry_after_secs }
                    }
                }
            }
        };

        tx.commit().await?;
        Ok(decision)
    }
}

/// What to do with an existing counter row.
#[derive(Debug, PartialEq, Eq)]
enum WindowAction {
    Reset,
    Increment,
    Reject { retry_after_secs: u64 },
}

/// Pure fixed-window decision: reset once the window has elapsed, reject
/// at the cap with the time left in the window, otherwise count the
/// request.
fn decide(
    window_started_at: DateTime<Utc>,
    count: u32,
    now: DateTime<Utc>,
    quota: RateQuota,
) -> WindowAction {
    let elapsed_secs = (now - window_started_at).num_seconds().max(0) as u64;
    if elapsed_secs >= quota.window_secs {
        WindowAction::Reset
    } else if count >= quota.max {
        WindowAction::Reject {
            retry_after_secs: quota.window_secs - elapsed_secs,
        }
    } else {
        WindowAction::Increment
    }
}

#[async_trait]
impl RateLimiter for MySqlRateLimiter {
    async fn check(&self, scope: &str, subject: &str, quota: RateQuota) -> RateDecision {
        match self.check_inner(scope, subject, quota).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(scope, error = %e, "rate limit check failed, failing open");
                RateDecision::Allowed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn quota() -> RateQuota {
        RateQuota {
            max: 3,
            window_secs: 60,
        }
    }

    #[test]
    fn under_cap_increments() {
        let now = Utc::now();
        let started = now - Duration::seconds(10);
        assert_eq!(decide(started, 2, now, quota()), WindowAction::Increment);
    }

    #[test]
    fn at_cap_rejects_with_time_left() {
        let now = Utc::now();
        let started = now - Duration::seconds(10);
        assert_eq!(
            decide(started, 3, now, quota()),
            WindowAction::Reject {
                retry_after_secs: 50
            }
        );
    }

    #[test]
    fn elapsed_window_resets_even_at_cap() {
        let now = Utc::now();
        let started = now - Duration::seconds(61);
        assert_eq!(decide(started, 3, now, quota()), WindowAction::Reset);
    }

    #[test]
    fn clock_skew_does_not_underflow() {
        // A window start in the future (clock skew between replicas)
        // must not panic or produce a giant retry-after.
        let now = Utc::now();
        let started = now + Duration::seconds(30);
        assert_eq!(
            decide(started, 3, now, quota()),
            WindowAction::Reject {
                retry_after_secs: 60
            }
        );
    }
}
