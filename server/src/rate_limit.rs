//! In-memory rate limiting for login attempts.
//!
//! DESIGN
//! ======
//! Sliding-window counters backed by `HashMap<String, VecDeque<Instant>>`,
//! keyed by submitted email. Limits apply before credential verification so
//! a guessing loop cannot probe password validity at full speed.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const DEFAULT_ATTEMPT_LIMIT: usize = 10;
const DEFAULT_WINDOW_SECS: u64 = 300;

#[derive(Clone, Copy)]
struct RateLimitConfig {
    attempt_limit: usize,
    window: Duration,
}

impl RateLimitConfig {
    fn from_env() -> Self {
        Self {
            attempt_limit: env_parse("LOGIN_RATE_LIMIT", DEFAULT_ATTEMPT_LIMIT),
            window: Duration::from_secs(env_parse("LOGIN_RATE_WINDOW_SECS", DEFAULT_WINDOW_SECS)),
        }
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[derive(Debug, thiserror::Error)]
#[error("too many attempts (max {limit} per {window_secs}s)")]
pub struct RateLimitError {
    pub limit: usize,
    pub window_secs: u64,
}

#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            config: RateLimitConfig::from_env(),
        }
    }

    #[cfg(test)]
    fn with_limits(attempt_limit: usize, window: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            config: RateLimitConfig { attempt_limit, window },
        }
    }

    /// Check the key's window, then record this attempt.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitError`] when the key has exhausted its window.
    pub fn check_and_record(&self, key: &str) -> Result<(), RateLimitError> {
        self.check_and_record_at(key, Instant::now())
    }

    /// Internal: check + record with explicit timestamp (for testing).
    fn check_and_record_at(&self, key: &str, now: Instant) -> Result<(), RateLimitError> {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let cfg = self.config;

        let deque = inner.entry(key.to_owned()).or_default();
        prune_window(deque, now, cfg.window);
        if deque.len() >= cfg.attempt_limit {
            return Err(RateLimitError {
                limit: cfg.attempt_limit,
                window_secs: cfg.window.as_secs(),
            });
        }

        deque.push_back(now);
        Ok(())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

fn prune_window(deque: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&front) = deque.front() {
        if now.duration_since(front) > window {
            deque.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
