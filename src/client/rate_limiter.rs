//! Rate Limiting
//!
//! Token bucket shared by every request of one client.
//!
//! The bucket is tracked as a single "theoretical arrival time" (the instant at
//! which the bucket would be full again). Each acquisition reserves the next
//! slot under the lock and then sleeps outside it, so concurrent callers wait
//! independently and are released in the order they reserved.

use crate::config::RateLimit;
use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Token bucket limiter
#[derive(Debug)]
pub struct RateLimiter {
    /// Time between two tokens
    emission: Duration,

    /// How far ahead of `now` the schedule may run before callers wait
    tolerance: Duration,

    /// Instant at which the next token is due
    next_due: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter for the given settings
    pub fn new(limit: RateLimit) -> Self {
        let emission = limit.emission_interval();
        Self {
            emission,
            tolerance: emission * limit.burst().saturating_sub(1),
            next_due: Mutex::new(None),
        }
    }

    /// Reserve a token, returning how long the caller has to wait for it
    pub fn reserve(&self) -> Duration {
        let now = Instant::now();
        let mut next_due = self.next_due.lock();

        let due = match *next_due {
            Some(due) if due > now => due,
            _ => now,
        };
        *next_due = Some(due + self.emission);

        due.saturating_duration_since(now)
            .saturating_sub(self.tolerance)
    }

    /// Wait until a token is available
    pub async fn acquire(&self) {
        let wait = self.reserve();
        if !wait.is_zero() {
            tracing::trace!(wait_ms = wait.as_millis() as u64, "rate limit reached, waiting");
            tokio::time::sleep(wait).await;
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimit::default())
    }
}
