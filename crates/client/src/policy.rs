//! Retry policy for non-streaming requests.
//!
//! The policy is a pure function of (attempt number, failure kind) so it can
//! be tested without any transport. Only rate-limited responses and network
//! failures are retried; application errors fail on the first attempt.

use std::time::Duration;

/// Total attempts allowed per call (first try included).
pub const MAX_ATTEMPTS: u32 = 3;

/// Base wait for a rate-limited retry; attempt N waits N x this.
const RATE_LIMIT_BASE: Duration = Duration::from_millis(2000);

/// Flat wait between network-failure retries.
const NETWORK_RETRY_WAIT: Duration = Duration::from_millis(1000);

/// How an attempt failed, as far as the policy cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 429-class response.
    RateLimited,
    /// Connect error, timeout, broken transfer.
    Network,
    /// Any other non-2xx application error.
    Application,
}

/// Decide whether attempt `attempt` (1-based) should be retried after
/// failing with `kind`, and how long to wait first.
///
/// Returns `None` when the call must fail now: application errors are never
/// retried, and nothing is retried past [`MAX_ATTEMPTS`]. Rate-limit waits
/// grow linearly with the attempt number; network waits are flat. The
/// asymmetry is inherited from the backend's documented client behavior.
pub fn retry_after(attempt: u32, kind: FailureKind) -> Option<Duration> {
    if attempt >= MAX_ATTEMPTS {
        return None;
    }
    match kind {
        FailureKind::RateLimited => Some(RATE_LIMIT_BASE * attempt),
        FailureKind::Network => Some(NETWORK_RETRY_WAIT),
        FailureKind::Application => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_backoff_is_linear() {
        let first = retry_after(1, FailureKind::RateLimited).unwrap();
        let second = retry_after(2, FailureKind::RateLimited).unwrap();
        assert_eq!(first, Duration::from_millis(2000));
        assert_eq!(second, Duration::from_millis(4000));
        assert!(second > first);
    }

    #[test]
    fn test_exhaustion_after_max_attempts() {
        assert!(retry_after(MAX_ATTEMPTS, FailureKind::RateLimited).is_none());
        assert!(retry_after(MAX_ATTEMPTS, FailureKind::Network).is_none());
        assert!(retry_after(MAX_ATTEMPTS + 1, FailureKind::RateLimited).is_none());
    }

    #[test]
    fn test_network_wait_is_flat() {
        assert_eq!(
            retry_after(1, FailureKind::Network),
            Some(Duration::from_millis(1000))
        );
        assert_eq!(
            retry_after(2, FailureKind::Network),
            Some(Duration::from_millis(1000))
        );
    }

    #[test]
    fn test_application_errors_never_retry() {
        assert!(retry_after(1, FailureKind::Application).is_none());
        assert!(retry_after(2, FailureKind::Application).is_none());
    }
}
