//! Outbound send rate limiting.
//!
//! The board's serial bridge silently loses bytes when commands arrive
//! faster than it can forward them, so the session counts sends against a
//! rolling one-second window and drops anything over the cap. Denial is
//! silent: the caller resolves as if the send happened, matching the
//! fire-and-forget contract of the whole outbound path.
//!
//! # Usage
//!
//! The [`RateLimiter`] is owned by the session; every rate-limited send
//! asks [`okay_to_send`](RateLimiter::okay_to_send) first and drops the
//! frame on `false`.

use std::time::{Duration, Instant};

use crate::config::DEFAULT_SEND_RATE_MAX;

/// Length of the rolling window sends are counted in.
pub const WINDOW: Duration = Duration::from_secs(1);

/// Counts sends against a rolling one-second window.
#[derive(Debug)]
pub struct RateLimiter {
    /// Maximum sends allowed per window.
    max_per_window: u32,
    /// Sends counted in the current window.
    sent: u32,
    /// When the current window opened.
    window_start: Instant,
}

impl RateLimiter {
    /// Create a limiter allowing `max_per_window` sends per second.
    pub fn new(max_per_window: u32) -> Self {
        Self {
            max_per_window,
            sent: 0,
            window_start: Instant::now(),
        }
    }

    /// Check whether one more send fits in the current window.
    ///
    /// Counts the send when it answers `true`; the caller must actually
    /// send (or deliberately drop the slot).
    pub fn okay_to_send(&mut self) -> bool {
        self.okay_at(Instant::now())
    }

    /// Sends counted so far in the current window.
    #[inline]
    pub fn sent_in_window(&self) -> u32 {
        self.sent
    }

    /// Maximum sends allowed per window.
    #[inline]
    pub fn max_per_window(&self) -> u32 {
        self.max_per_window
    }

    fn okay_at(&mut self, now: Instant) -> bool {
        if now.duration_since(self.window_start) >= WINDOW {
            self.window_start = now;
            self.sent = 0;
        }
        if self.sent < self.max_per_window {
            self.sent += 1;
            true
        } else {
            false
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_SEND_RATE_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_cap() {
        let mut limiter = RateLimiter::new(10);
        let start = Instant::now();

        for _ in 0..10 {
            assert!(limiter.okay_at(start));
        }
        assert_eq!(limiter.sent_in_window(), 10);
    }

    #[test]
    fn test_denies_over_cap() {
        let mut limiter = RateLimiter::new(10);
        let start = Instant::now();

        for _ in 0..10 {
            assert!(limiter.okay_at(start));
        }
        assert!(!limiter.okay_at(start));
        assert!(!limiter.okay_at(start + Duration::from_millis(999)));
    }

    #[test]
    fn test_window_elapse_resets_count() {
        let mut limiter = RateLimiter::new(2);
        let start = Instant::now();

        assert!(limiter.okay_at(start));
        assert!(limiter.okay_at(start));
        assert!(!limiter.okay_at(start));

        // A fresh window opens once a full second has passed.
        assert!(limiter.okay_at(start + Duration::from_secs(1)));
        assert_eq!(limiter.sent_in_window(), 1);
    }

    #[test]
    fn test_denial_does_not_consume_slot() {
        let mut limiter = RateLimiter::new(1);
        let start = Instant::now();

        assert!(limiter.okay_at(start));
        assert!(!limiter.okay_at(start));
        assert_eq!(limiter.sent_in_window(), 1);
    }

    #[test]
    fn test_default_uses_configured_rate() {
        let limiter = RateLimiter::default();
        assert_eq!(limiter.max_per_window(), DEFAULT_SEND_RATE_MAX);
    }

    #[test]
    fn test_wall_clock_path() {
        let mut limiter = RateLimiter::new(3);
        assert!(limiter.okay_to_send());
        assert!(limiter.okay_to_send());
        assert!(limiter.okay_to_send());
        assert!(!limiter.okay_to_send());
    }
}
