//! Brute-force protection for the login endpoint
//!
//! Failures are counted per client key inside a sliding window; reaching the
//! limit locks the key out, and each further lockout doubles in length.

use crate::config::LoginRateLimitConfig;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::warn;

/// Lockouts stop doubling after this many repeats
const MAX_BACKOFF_EXPONENT: u32 = 6;

#[derive(Debug)]
pub struct AuthRateLimiter {
    attempts: DashMap<String, AttemptTracker>,
    max_failures: u32,
    window_secs: u64,
    base_lockout_secs: u64,
    blocked_count: AtomicU64,
}

#[derive(Debug)]
struct AttemptTracker {
    failure_count: u32,
    window_start: Instant,
    lockout_until: Option<Instant>,
    lockout_count: u32,
}

impl AttemptTracker {
    fn new(now: Instant) -> Self {
        Self {
            failure_count: 0,
            window_start: now,
            lockout_until: None,
            lockout_count: 0,
        }
    }
}

impl Default for AuthRateLimiter {
    fn default() -> Self {
        Self::from_config(&LoginRateLimitConfig::default())
    }
}

impl AuthRateLimiter {
    pub fn new(max_failures: u32, window_secs: u64, base_lockout_secs: u64) -> Self {
        Self {
            attempts: DashMap::new(),
            max_failures: max_failures.max(1),
            window_secs,
            base_lockout_secs,
            blocked_count: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &LoginRateLimitConfig) -> Self {
        Self::new(config.max_failures, config.window_secs, config.lockout_secs)
    }

    /// `Err` carries the seconds left on an active lockout
    pub fn check_allowed(&self, client_key: &str) -> Result<(), u64> {
        let now = Instant::now();
        let mut entry = self
            .attempts
            .entry(client_key.to_string())
            .or_insert_with(|| AttemptTracker::new(now));
        let tracker = entry.value_mut();

        if let Some(lockout_until) = tracker.lockout_until {
            if now < lockout_until {
                self.blocked_count.fetch_add(1, Ordering::Relaxed);
                return Err(lockout_until.duration_since(now).as_secs().max(1));
            }
            tracker.lockout_until = None;
            tracker.failure_count = 0;
            tracker.window_start = now;
        }

        if now.duration_since(tracker.window_start) > Duration::from_secs(self.window_secs) {
            tracker.failure_count = 0;
            tracker.window_start = now;
        }

        Ok(())
    }

    /// Count a failure; returns the lockout length when this one triggers it
    pub fn record_failure(&self, client_key: &str) -> Option<u64> {
        let now = Instant::now();
        let mut entry = self
            .attempts
            .entry(client_key.to_string())
            .or_insert_with(|| AttemptTracker::new(now));
        let tracker = entry.value_mut();
        tracker.failure_count += 1;

        if tracker.failure_count < self.max_failures {
            return None;
        }

        let multiplier = 2u64.pow(tracker.lockout_count.min(MAX_BACKOFF_EXPONENT));
        let lockout_secs = self.base_lockout_secs.saturating_mul(multiplier);
        tracker.lockout_until = Some(now + Duration::from_secs(lockout_secs));
        tracker.lockout_count += 1;
        tracker.failure_count = 0;

        warn!(
            "Login locked for {} seconds after {} failures (lockout #{})",
            lockout_secs, self.max_failures, tracker.lockout_count
        );
        Some(lockout_secs)
    }

    pub fn record_success(&self, client_key: &str) {
        if let Some(mut entry) = self.attempts.get_mut(client_key) {
            entry.failure_count = 0;
            entry.lockout_until = None;
            entry.lockout_count = 0;
        }
    }

    pub fn blocked_attempts(&self) -> u64 {
        self.blocked_count.load(Ordering::Relaxed)
    }

    pub fn tracked_clients(&self) -> usize {
        self.attempts.len()
    }

    /// Forget keys that are neither recent nor locked out
    pub fn cleanup_old_entries(&self) {
        let now = Instant::now();
        let max_age = Duration::from_secs(self.window_secs.saturating_mul(2));

        self.attempts.retain(|_, tracker| {
            now.duration_since(tracker.window_start) < max_age
                || tracker.lockout_until.is_some_and(|until| until > now)
        });
    }
}

/// Rate-limit key for a login attempt: client address plus the targeted account
pub fn login_key(ip_address: Option<&str>, email: &str) -> String {
    format!(
        "{}|{}",
        ip_address.unwrap_or("unknown"),
        crate::utils::normalize_email(email)
    )
}
