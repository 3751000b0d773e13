//! Fixed-window rate limiting interface.

use async_trait::async_trait;

/// A fixed-window quota: at most `max` requests per `window_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateQuota {
    pub max: u32,
    pub window_secs: u64,
}

impl RateQuota {
    pub const fn per_minute(max: u32) -> Self {
        Self {
            max,
            window_secs: 60,
        }
    }

    pub const fn per_hour(max: u32) -> Self {
        Self {
            max,
            window_secs: 3600,
        }
    }
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after_secs: u64 },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed)
    }
}

/// Fixed-window counter keyed by `(scope, subject)`.
///
/// A passing check counts as the request: load-or-create the counter row,
/// reset it when the window has elapsed, otherwise reject at the cap or
/// increment.
///
/// Implementations fail OPEN: a storage error during the check returns
/// `Allowed` (with a warning log) rather than blocking legitimate
/// traffic. That tradeoff is part of this contract, not a bug in any
/// particular backend.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record a request against the quota and decide whether it may pass.
    async fn check(&self, scope: &str, subject: &str, quota: RateQuota) -> RateDecision;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_constructors() {
        assert_eq!(
            RateQuota::per_minute(10),
            RateQuota {
                max: 10,
                window_secs: 60
            }
        );
        assert_eq!(
            RateQuota::per_hour(120),
            RateQuota {
                max: 120,
                window_secs: 3600
            }
        );
    }

    #[test]
    fn decision_predicates() {
        assert!(RateDecision::Allowed.is_allowed());
        assert!(!RateDecision::Limited {
            retry_after_secs: 30
        }
        .is_allowed());
    }
}
