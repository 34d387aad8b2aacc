//! Exponential backoff with jitter.

use super::bounds::{clamp_to_bounds, scale_duration};
use super::strategy::{Sequence, trace_delay, trace_exhausted};
use crate::config::BackoffConfig;
use std::time::Duration;

/// Growth factor used when the supplied one is not greater than 1.0.
pub const DEFAULT_EXPONENTIAL_FACTOR: f64 = 2.0;

/// Exponential backoff: every delay is the previous one times `factor`.
///
/// # Mathematical Formula
///
/// For call `n` (0-indexed since construction or reset):
/// ```text
/// raw(0)   = base
/// raw(n)   = delay(n - 1) * factor
/// delay(n) = clamp(jitter(raw(n)), min_interval, max_interval)
/// ```
///
/// Growth compounds on the delay actually returned, so jitter and the
/// bounds feed back into the next step. A product that does not fit in a
/// `Duration` saturates at `Duration::MAX` before the bounds are applied.
///
/// The elapsed budget is checked against the finished delay: a call whose
/// delay would bring the elapsed total to or past `max_elapsed` returns
/// `None` and commits nothing.
///
/// # Examples
///
/// ```rust
/// use backoffkit_core::config::BackoffConfig;
/// use backoffkit_core::retry::{Exponential, Sequence};
/// use std::time::Duration;
///
/// let config = BackoffConfig::builder()
///     .max_interval(Duration::from_millis(50))
///     .build();
/// let mut backoff = Exponential::new(Duration::from_millis(10), 2.0, config);
///
/// let delays: Vec<_> = backoff.iter().take(4).collect();
/// assert_eq!(
///     delays,
///     [10, 20, 40, 50].map(Duration::from_millis).to_vec(),
/// );
/// ```
///
/// # Performance Characteristics
///
/// - **Memory**: O(1) - no allocations per call
/// - **CPU**: O(1) per call - one multiply, at most one random draw
#[derive(Debug)]
pub struct Exponential {
    config: BackoffConfig,
    base: Duration,
    factor: f64,

    retries: u32,
    elapsed: Duration,
    current: Duration,
}

impl Exponential {
    /// Create an exponential sequence starting at `base`.
    ///
    /// A `factor` that is not greater than 1.0 (including NaN) is replaced
    /// by [`DEFAULT_EXPONENTIAL_FACTOR`].
    pub fn new(base: Duration, factor: f64, config: BackoffConfig) -> Self {
        let factor = if factor > 1.0 {
            factor
        } else {
            DEFAULT_EXPONENTIAL_FACTOR
        };

        Self {
            config,
            base,
            factor,
            retries: 0,
            elapsed: Duration::ZERO,
            current: Duration::ZERO,
        }
    }

    /// The initial delay.
    pub fn base(&self) -> Duration {
        self.base
    }

    /// The effective growth factor.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// The config this sequence was built with.
    pub fn config(&self) -> &BackoffConfig {
        &self.config
    }
}

impl Sequence for Exponential {
    fn next_delay(&mut self) -> Option<Duration> {
        if self.config.retries_exhausted(self.retries) {
            trace_exhausted("exponential", "max_retries", self.retries, self.elapsed);
            return None;
        }

        let raw = if self.retries == 0 {
            self.base
        } else {
            scale_duration(self.current, self.factor)
        };

        let jittered = self.config.apply_jitter(raw);
        let delay = clamp_to_bounds(jittered, self.config.min_interval, self.config.max_interval);

        if let Some(budget) = self.config.elapsed_budget()
            && self.elapsed.saturating_add(delay) >= budget
        {
            trace_exhausted("exponential", "max_elapsed", self.retries, self.elapsed);
            return None;
        }

        self.current = delay;
        self.retries = self.retries.saturating_add(1);
        self.elapsed = self.elapsed.saturating_add(delay);
        trace_delay("exponential", delay, self.retries, self.elapsed);
        Some(delay)
    }

    fn reset(&mut self) {
        self.retries = 0;
        self.elapsed = Duration::ZERO;
        self.current = Duration::ZERO;
    }

    fn retries(&self) -> u32 {
        self.retries
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
