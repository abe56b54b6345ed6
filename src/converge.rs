//! Retry-until-converged polling.
//!
//! The Datadog API is eventually consistent: a monitor deleted a moment ago can
//! still be served by a GET, and a freshly created dashboard may not be listed
//! yet. Checks wrap their probe in [`retry`], which re-runs it on a fixed delay
//! until it reports success, gives up on a fatal error, or runs out of attempts.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// Attempts used by destroy checks unless told otherwise.
pub const DEFAULT_ATTEMPTS: u32 = 10;

/// Delay between two attempts unless told otherwise.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Outcome of a failed probe.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// Remote state has not converged yet; the probe may be attempted again.
    #[error("{0}")]
    Retryable(String),

    /// Nothing to wait for: malformed response, unexpected HTTP status, etc.
    #[error("{0}")]
    Fatal(String),
}

impl ProbeError {
    pub fn retryable(msg: impl Into<String>) -> Self {
        ProbeError::Retryable(msg.into())
    }

    pub fn fatal(msg: impl Into<String>) -> Self {
        ProbeError::Fatal(msg.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ProbeError::Retryable(_))
    }
}

/// Fixed attempt budget and delay for a polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPTS, DEFAULT_DELAY)
    }
}

/// Run `probe` until it succeeds, fails fatally, or `policy.attempts` runs out.
///
/// Linear schedule: attempt, sleep `policy.delay`, attempt again. There is no
/// sleep after the final attempt. When every attempt is retryable the last
/// [`ProbeError::Retryable`] is returned unchanged. An attempt count of zero
/// still runs the probe once.
pub async fn retry<T, F, Fut>(policy: RetryPolicy, mut probe: F) -> Result<T, ProbeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProbeError>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;

    loop {
        match probe().await {
            Ok(value) => return Ok(value),
            Err(ProbeError::Fatal(msg)) => {
                log::debug!("Probe failed fatally on attempt {}: {}", attempt, msg);
                return Err(ProbeError::Fatal(msg));
            }
            Err(ProbeError::Retryable(msg)) => {
                if attempt >= attempts {
                    log::debug!("Probe still failing after {} attempts: {}", attempt, msg);
                    return Err(ProbeError::Retryable(msg));
                }
                log::debug!(
                    "Probe attempt {}/{} not converged ({}), retrying in {:?}",
                    attempt,
                    attempts,
                    msg,
                    policy.delay
                );
            }
        }

        attempt += 1;
        tokio::time::sleep(policy.delay).await;
    }
}
