//! Send-rate limiting utilities.
//!
//! A fixed window per key: the first request opens a window, requests
//! within it count against the quota, and an expired window resets lazily
//! on the next request. State lives in process memory; this is a UX
//! throttle per instance, not a distributed limit.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for rate limiting.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum number of requests allowed within the time window.
    pub max_requests: u32,
    /// Time window duration.
    pub time_window: Duration,
    /// Whether rate limiting is enabled.
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::for_sms_send()
    }
}

impl RateLimitConfig {
    /// Creates a new rate limit config.
    pub fn new(max_requests: u32, time_window: Duration) -> Self {
        Self {
            max_requests,
            time_window,
            enabled: true,
        }
    }

    /// Disables rate limiting.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::for_sms_send()
        }
    }

    /// Creates the config for SMS code sends: 5 per hour per phone.
    pub fn for_sms_send() -> Self {
        Self::new(5, Duration::hours(1))
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed.
    Allowed {
        /// Remaining requests in the current window.
        remaining: u32,
        /// When the current window resets.
        reset_at: DateTime<Utc>,
    },
    /// Request is rate limited.
    Limited {
        /// When the rate limit resets.
        reset_at: DateTime<Utc>,
        /// How long to wait before retrying (in milliseconds).
        retry_after_ms: i64,
    },
}

impl RateLimitResult {
    /// Returns true if the request is allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }

    /// Returns true if the request is rate limited.
    pub fn is_limited(&self) -> bool {
        matches!(self, RateLimitResult::Limited { .. })
    }
}

/// Read-only view of a key's current window, for UI display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStats {
    /// Sends left in the current window.
    pub remaining: u32,
    /// When the current window resets. `None` when no window is open.
    pub reset_at: Option<DateTime<Utc>>,
}

/// Tracks rate limit state for a single key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RateLimitState {
    /// Number of requests in the current window.
    request_count: u32,
    /// When the current window started.
    window_start: DateTime<Utc>,
}

/// In-memory rate limiter keyed by normalized phone number.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    states: HashMap<String, RateLimitState>,
}

impl RateLimiter {
    /// Creates a new rate limiter with the given config.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            states: HashMap::new(),
        }
    }

    /// Checks if a request is allowed for the given key, consuming one
    /// slot when it is.
    pub fn check(&mut self, key: &str) -> RateLimitResult {
        self.check_at(key, Utc::now())
    }

    /// Same as [`check`](Self::check) with an explicit current time.
    pub fn check_at(&mut self, key: &str, now: DateTime<Utc>) -> RateLimitResult {
        if !self.config.enabled {
            return RateLimitResult::Allowed {
                remaining: u32::MAX,
                reset_at: now + Duration::days(365),
            };
        }

        if let Some(state) = self.states.get_mut(key) {
            let window_end = state.window_start + self.config.time_window;

            if now > window_end {
                // Window expired, start a fresh one
                state.request_count = 1;
                state.window_start = now;

                RateLimitResult::Allowed {
                    remaining: self.config.max_requests - 1,
                    reset_at: now + self.config.time_window,
                }
            } else if state.request_count >= self.config.max_requests {
                let retry_after = (window_end - now).num_milliseconds();
                RateLimitResult::Limited {
                    reset_at: window_end,
                    retry_after_ms: retry_after.max(0),
                }
            } else {
                state.request_count += 1;

                RateLimitResult::Allowed {
                    remaining: self.config.max_requests - state.request_count,
                    reset_at: window_end,
                }
            }
        } else {
            self.states.insert(
                key.to_string(),
                RateLimitState {
                    request_count: 1,
                    window_start: now,
                },
            );

            RateLimitResult::Allowed {
                remaining: self.config.max_requests - 1,
                reset_at: now + self.config.time_window,
            }
        }
    }

    /// Returns the current window view for a key without consuming a slot.
    pub fn stats(&self, key: &str) -> RateLimitStats {
        self.stats_at(key, Utc::now())
    }

    /// Same as [`stats`](Self::stats) with an explicit current time.
    pub fn stats_at(&self, key: &str, now: DateTime<Utc>) -> RateLimitStats {
        match self.states.get(key) {
            Some(state) if now <= state.window_start + self.config.time_window => RateLimitStats {
                remaining: self.config.max_requests.saturating_sub(state.request_count),
                reset_at: Some(state.window_start + self.config.time_window),
            },
            _ => RateLimitStats {
                remaining: self.config.max_requests,
                reset_at: None,
            },
        }
    }

    /// Resets the rate limit for a key (administrative escape hatch).
    pub fn reset(&mut self, key: &str) {
        self.states.remove(key);
    }

    /// Cleans up expired entries.
    pub fn cleanup(&mut self) {
        let now = Utc::now();
        self.states
            .retain(|_, state| state.window_start + self.config.time_window > now);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_quota() {
        let mut limiter = RateLimiter::new(RateLimitConfig::for_sms_send());

        for _ in 0..5 {
            assert!(limiter.check("+5511987654321").is_allowed());
        }
        assert!(limiter.check("+5511987654321").is_limited());
    }

    #[test]
    fn test_sixth_send_denied_within_window() {
        let mut limiter = RateLimiter::new(RateLimitConfig::for_sms_send());
        let start = Utc::now();

        for i in 0..5 {
            let result = limiter.check_at("+5511987654321", start + Duration::minutes(i));
            assert!(result.is_allowed(), "send {} should pass", i + 1);
        }

        let sixth = limiter.check_at("+5511987654321", start + Duration::minutes(10));
        assert!(sixth.is_limited());
    }

    #[test]
    fn test_fresh_window_after_expiry() {
        let mut limiter = RateLimiter::new(RateLimitConfig::for_sms_send());
        let start = Utc::now();

        for _ in 0..5 {
            limiter.check_at("+5511987654321", start);
        }
        assert!(limiter.check_at("+5511987654321", start).is_limited());

        let later = start + Duration::hours(1) + Duration::seconds(1);
        match limiter.check_at("+5511987654321", later) {
            RateLimitResult::Allowed { remaining, .. } => assert_eq!(remaining, 4),
            other => panic!("expected fresh window, got {:?}", other),
        }
    }

    #[test]
    fn test_separate_keys() {
        let mut limiter = RateLimiter::new(RateLimitConfig::new(1, Duration::minutes(1)));

        assert!(limiter.check("+5511911111111").is_allowed());
        assert!(limiter.check("+5511911111111").is_limited());
        assert!(limiter.check("+5521922222222").is_allowed());
    }

    #[test]
    fn test_stats_do_not_consume() {
        let mut limiter = RateLimiter::new(RateLimitConfig::for_sms_send());

        assert_eq!(limiter.stats("+5511987654321").remaining, 5);
        assert!(limiter.stats("+5511987654321").reset_at.is_none());

        limiter.check("+5511987654321");
        let stats = limiter.stats("+5511987654321");
        assert_eq!(stats.remaining, 4);
        assert!(stats.reset_at.is_some());
    }

    #[test]
    fn test_admin_reset() {
        let mut limiter = RateLimiter::new(RateLimitConfig::new(1, Duration::hours(1)));

        assert!(limiter.check("+5511987654321").is_allowed());
        assert!(limiter.check("+5511987654321").is_limited());

        limiter.reset("+5511987654321");
        assert!(limiter.check("+5511987654321").is_allowed());
    }

    #[test]
    fn test_disabled() {
        let mut limiter = RateLimiter::new(RateLimitConfig::disabled());

        for _ in 0..100 {
            assert!(limiter.check("+5511987654321").is_allowed());
        }
    }
}
