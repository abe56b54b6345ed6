use std::time::Duration;

use reqwest::StatusCode;

use crate::config::HttpRetryConfig;

/// Status codes worth retrying at the HTTP layer: throttling and server errors.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Backoff before retry number `retry_count` (1-based)
///
/// Returns: `backoff_base * backoff_multiplier^(retry_count - 1)`
/// - Retry 1: 2 seconds
/// - Retry 2: 4 seconds
/// - Retry 3: 8 seconds
///
/// Saturates at `Duration::MAX`.
pub fn calculate_backoff(config: &HttpRetryConfig, retry_count: u32) -> Duration {
    if config.backoff_base.is_zero() {
        return Duration::ZERO;
    }
    let exponent = i32::try_from(retry_count.saturating_sub(1)).unwrap_or(i32::MAX);
    let factor = config.backoff_multiplier.max(1.0).powi(exponent);
    Duration::try_from_secs_f64(config.backoff_base.as_secs_f64() * factor).unwrap_or(Duration::MAX)
}

/// Wait requested by a 429 through `X-RateLimit-Reset` (seconds), if any.
pub fn rate_limit_reset(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Check if another retry should be attempted
pub fn should_retry(config: &HttpRetryConfig, current_retry: u32) -> bool {
    config.enabled && current_retry < config.max_retries
}

/// Whether waiting `next_wait` more keeps the request inside its retry budget.
pub fn within_budget(config: &HttpRetryConfig, elapsed: Duration, next_wait: Duration) -> bool {
    elapsed
        .checked_add(next_wait)
        .is_some_and(|total| total <= config.timeout)
}
