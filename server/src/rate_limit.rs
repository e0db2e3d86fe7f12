use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::{
    data::UserRef,
    error::{GameError, Result},
};

#[derive(Debug)]
pub struct TokenBucket {
    last_refill: Instant,
    tokens: u32,
    capacity: u32,
    refill_interval: Duration,
}

impl TokenBucket {
    fn new(capacity: u32, refill_interval: Duration, now: Instant) -> Self {
        debug!(
            "Creating new token bucket: capacity={}, interval={}s",
            capacity,
            refill_interval.as_secs()
        );
        Self {
            last_refill: now,
            tokens: capacity,
            capacity,
            refill_interval,
        }
    }

    fn try_consume(&mut self, now: Instant) -> bool {
        self.refill(now);
        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Refills to full capacity once per elapsed interval.
    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        if elapsed >= self.refill_interval {
            self.tokens = self.capacity;
            self.last_refill = now;
        }
    }
}

/// Game-creation budget per user.
#[derive(Debug)]
pub struct RateLimiter {
    buckets: DashMap<String, TokenBucket>,
    capacity: u32,
    refill_interval: Duration,
}

impl RateLimiter {
    pub fn per_minute(capacity: u32) -> Self {
        Self {
            buckets: DashMap::new(),
            capacity,
            refill_interval: Duration::from_secs(60),
        }
    }

    pub fn check(&self, user: &UserRef) -> Result<()> {
        self.check_at(user, Instant::now())
    }

    fn check_at(&self, user: &UserRef, now: Instant) -> Result<()> {
        let mut bucket = self
            .buckets
            .entry(user.id.clone())
            .or_insert_with(|| TokenBucket::new(self.capacity, self.refill_interval, now));

        if bucket.try_consume(now) {
            Ok(())
        } else {
            warn!("Rate limit exceeded for user {}", user.id);
            Err(GameError::RateLimited)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_per_user_and_refills() {
        let limiter = RateLimiter::per_minute(2);
        let alice = UserRef::new("alice");
        let bob = UserRef::new("bob");
        let start = Instant::now();

        assert!(limiter.check_at(&alice, start).is_ok());
        assert!(limiter.check_at(&alice, start).is_ok());
        assert_eq!(limiter.check_at(&alice, start), Err(GameError::RateLimited));
        assert!(limiter.check_at(&bob, start).is_ok());

        let later = start + Duration::from_secs(61);
        assert!(limiter.check_at(&alice, later).is_ok());
    }
}
