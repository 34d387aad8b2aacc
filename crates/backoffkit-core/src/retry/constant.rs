//! Fixed-interval backoff.

use super::strategy::{Sequence, trace_delay, trace_exhausted};
use crate::config::BackoffConfig;
use std::time::Duration;

/// Returns the same delay on every retry.
///
/// The interval is used literally: jitter and the min/max interval bounds of
/// the config are not applied. Only the retry limit and the elapsed budget
/// are honored. The elapsed budget is checked before the delay is added, so
/// the last permitted delay may overshoot it.
///
/// # Examples
///
/// ```rust
/// use backoffkit_core::config::BackoffConfig;
/// use backoffkit_core::retry::{Constant, Sequence};
/// use std::time::Duration;
///
/// let config = BackoffConfig::builder()
///     .max_elapsed(Duration::from_millis(250))
///     .build();
/// let mut backoff = Constant::new(Duration::from_millis(100), config);
///
/// // 0ms, 100ms and 200ms are all under the budget
/// assert_eq!(backoff.iter().count(), 3);
/// ```
#[derive(Debug)]
pub struct Constant {
    config: BackoffConfig,
    interval: Duration,
    retries: u32,
    elapsed: Duration,
}

impl Constant {
    /// Create a constant sequence that waits `interval` between retries.
    pub fn new(interval: Duration, config: BackoffConfig) -> Self {
        Self {
            config,
            interval,
            retries: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// The fixed interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The config this sequence was built with.
    pub fn config(&self) -> &BackoffConfig {
        &self.config
    }
}

impl Sequence for Constant {
    fn next_delay(&mut self) -> Option<Duration> {
        if self.config.retries_exhausted(self.retries) {
            trace_exhausted("constant", "max_retries", self.retries, self.elapsed);
            return None;
        }

        if let Some(budget) = self.config.elapsed_budget()
            && self.elapsed >= budget
        {
            trace_exhausted("constant", "max_elapsed", self.retries, self.elapsed);
            return None;
        }

        self.retries = self.retries.saturating_add(1);
        self.elapsed = self.elapsed.saturating_add(self.interval);
        trace_delay("constant", self.interval, self.retries, self.elapsed);
        Some(self.interval)
    }

    fn reset(&mut self) {
        self.retries = 0;
        self.elapsed = Duration::ZERO;
    }

    fn retries(&self) -> u32 {
        self.retries
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
