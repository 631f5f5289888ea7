use std::time::Duration;

/// Coarse failure class used for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connect or transfer timed out.
    Timeout,
    /// 429 or 503.
    Throttled,
    /// DNS, refused, reset, empty reply.
    Connection,
    /// Other 5xx.
    Http5xx(u16),
    /// Everything else (4xx, bad input, disk errors). Never retried.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Capped exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per image, counting the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// `attempt` is 1-based: the attempt that just failed.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts || kind == ErrorKind::Other {
            return RetryDecision::NoRetry;
        }
        // base * 2^(attempt-1), shift clamped so the multiplier cannot overflow.
        let factor = 1u32 << attempt.saturating_sub(1).min(8);
        let delay = self.base_delay.saturating_mul(factor).min(self.max_delay);
        RetryDecision::RetryAfter(delay)
    }
}
