//! Token-bucket rate limiter for outbound provider calls.
//!
//! Bounds the outbound call rate independent of breaker/retry state. A
//! caller that cannot be granted a permit within its wait window fails
//! immediately with [`RateLimitExceeded`] instead of queuing
//! indefinitely.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Returned when a permit cannot be granted within the wait window.
#[derive(Debug, thiserror::Error)]
#[error("rate limit exceeded: next permit in {needed_ms} ms, wait window is {max_wait_ms} ms")]
pub struct RateLimitExceeded {
    pub needed_ms: u64,
    pub max_wait_ms: u64,
}

/// Tunable parameters for the token bucket.
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Steady-state refill rate.
    pub permits_per_second: f64,
    /// Bucket capacity (burst size).
    pub burst: u32,
    /// Longest a caller is willing to wait for a permit.
    pub max_wait: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            permits_per_second: 10.0,
            burst: 10,
            max_wait: Duration::from_millis(100),
        }
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token-bucket limiter shared by all concurrent callers of one
/// operation. State is owned here and synchronized behind a mutex.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        let tokens = f64::from(config.burst);
        Self {
            config,
            bucket: Mutex::new(Bucket {
                tokens,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Acquire one permit, sleeping up to `max_wait` when the bucket is
    /// momentarily empty.
    ///
    /// Reserves the permit before sleeping (the bucket may go negative),
    /// so concurrent waiters each get a distinct slot and the computed
    /// wait stays accurate under contention.
    pub async fn acquire(&self) -> Result<(), RateLimitExceeded> {
        let wait = {
            let mut bucket = self.bucket.lock().expect("rate limiter mutex poisoned");
            self.refill(&mut bucket);

            if bucket.tokens >= 1.0 {
                bucket.tokens -= 1.0;
                None
            } else {
                let deficit = 1.0 - bucket.tokens;
                let needed = Duration::from_secs_f64(deficit / self.config.permits_per_second);
                if needed > self.config.max_wait {
                    return Err(RateLimitExceeded {
                        needed_ms: needed.as_millis() as u64,
                        max_wait_ms: self.config.max_wait.as_millis() as u64,
                    });
                }
                bucket.tokens -= 1.0;
                Some(needed)
            }
        };

        if let Some(needed) = wait {
            tokio::time::sleep(needed).await;
        }
        Ok(())
    }

    fn refill(&self, bucket: &mut Bucket) {
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens =
            (bucket.tokens + elapsed * self.config.permits_per_second).min(f64::from(self.config.burst));
        bucket.last_refill = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn burst_is_granted_immediately() {
        let limiter = RateLimiter::new(RateLimiterConfig {
            permits_per_second: 1.0,
            burst: 3,
            max_wait: Duration::ZERO,
        });
        for _ in 0..3 {
            limiter.acquire().await.unwrap();
        }
    }

    #[tokio::test]
    async fn exhausted_bucket_fails_immediately_with_zero_wait_window() {
        let limiter = RateLimiter::new(RateLimiterConfig {
            permits_per_second: 0.1,
            burst: 1,
            max_wait: Duration::ZERO,
        });
        limiter.acquire().await.unwrap();
        let err = limiter.acquire().await.unwrap_err();
        assert!(err.needed_ms > 0);
    }

    #[tokio::test]
    async fn short_deficit_waits_within_window() {
        let limiter = RateLimiter::new(RateLimiterConfig {
            permits_per_second: 1000.0,
            burst: 1,
            max_wait: Duration::from_millis(50),
        });
        limiter.acquire().await.unwrap();
        // Deficit refills in ~1 ms, comfortably inside the window.
        limiter.acquire().await.unwrap();
    }

    #[tokio::test]
    async fn refill_restores_capacity() {
        let limiter = RateLimiter::new(RateLimiterConfig {
            permits_per_second: 100.0,
            burst: 1,
            max_wait: Duration::ZERO,
        });
        limiter.acquire().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        limiter.acquire().await.unwrap();
    }
}
