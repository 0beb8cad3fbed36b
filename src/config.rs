//! Session configuration.
//!
//! Board revisions ship with different pacing constants: the serial bridge
//! firmware caps inbound commands per second, and newer revisions re-announce
//! the controller after a different number of status frames. All of those
//! knobs live here so a revision difference is configuration, not a fork.

use std::time::Duration;

/// Default maximum sends per rolling one-second window.
pub const DEFAULT_SEND_RATE_MAX: u32 = 10;

/// Default settle delay awaited after each write command.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Default inbound-silence span after which the watchdog declares the link dead.
pub const DEFAULT_STALL_TIMEOUT: Duration = Duration::from_secs(3);

/// Default number of secondary status blocks counted before re-announcing.
pub const DEFAULT_ANNOUNCE_THRESHOLD: u32 = 2;

/// Configuration for a board session.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Maximum sends per rolling one-second window.
    pub send_rate_max: u32,
    /// Delay awaited after each write command before the caller resumes.
    pub settle_delay: Duration,
    /// Inbound-silence span after which the watchdog declares the link dead.
    pub stall_timeout: Duration,
    /// Secondary status blocks counted before the session re-announces itself.
    pub announce_threshold: u32,
}

impl LinkConfig {
    /// Create a configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum sends per rolling window.
    pub fn with_send_rate_max(mut self, max: u32) -> Self {
        self.send_rate_max = max;
        self
    }

    /// Set the settle delay awaited after each write command.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the stall timeout for the inbound watchdog.
    pub fn with_stall_timeout(mut self, timeout: Duration) -> Self {
        self.stall_timeout = timeout;
        self
    }

    /// Set the secondary-block count that triggers a re-announce.
    pub fn with_announce_threshold(mut self, threshold: u32) -> Self {
        self.announce_threshold = threshold;
        self
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            send_rate_max: DEFAULT_SEND_RATE_MAX,
            settle_delay: DEFAULT_SETTLE_DELAY,
            stall_timeout: DEFAULT_STALL_TIMEOUT,
            announce_threshold: DEFAULT_ANNOUNCE_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LinkConfig::new();
        assert_eq!(config.send_rate_max, DEFAULT_SEND_RATE_MAX);
        assert_eq!(config.settle_delay, DEFAULT_SETTLE_DELAY);
        assert_eq!(config.stall_timeout, DEFAULT_STALL_TIMEOUT);
        assert_eq!(config.announce_threshold, DEFAULT_ANNOUNCE_THRESHOLD);
    }

    #[test]
    fn test_builder_setters() {
        let config = LinkConfig::new()
            .with_send_rate_max(4)
            .with_settle_delay(Duration::from_millis(25))
            .with_stall_timeout(Duration::from_millis(500))
            .with_announce_threshold(1);

        assert_eq!(config.send_rate_max, 4);
        assert_eq!(config.settle_delay, Duration::from_millis(25));
        assert_eq!(config.stall_timeout, Duration::from_millis(500));
        assert_eq!(config.announce_threshold, 1);
    }
}
