//! Retry policy for transient access denials
//!
//! The collection store answers `403 Forbidden` while freshly issued
//! credentials propagate. Those responses are retried with a fixed delay, up
//! to a fixed number of attempts.

use reqwest::StatusCode;
use std::time::Duration;

/// Default number of attempts per HTTP call
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default delay between attempts in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// Bounded fixed-delay retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one (>= 1)
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Whether a response status is a transient denial worth retrying
    pub fn is_transient_denial(status: StatusCode) -> bool {
        status == StatusCode::FORBIDDEN
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_forbidden_is_transient() {
        assert!(RetryPolicy::is_transient_denial(StatusCode::FORBIDDEN));
        assert!(!RetryPolicy::is_transient_denial(StatusCode::UNAUTHORIZED));
        assert!(!RetryPolicy::is_transient_denial(
            StatusCode::INTERNAL_SERVER_ERROR
        ));
        assert!(!RetryPolicy::is_transient_denial(StatusCode::OK));
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.delay, Duration::from_secs(1));
    }
}
