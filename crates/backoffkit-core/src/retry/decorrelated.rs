//! Decorrelated jitter backoff.

use super::bounds::{clamp_to_bounds, scale_duration, uniform_between};
use super::strategy::{Sequence, trace_delay, trace_exhausted};
use crate::config::BackoffConfig;
use std::time::Duration;

/// Growth factor used when the supplied one is not greater than 1.0.
pub const DEFAULT_DECORRELATED_FACTOR: f64 = 3.0;

/// Ceiling forced onto the config when it has none.
pub const DEFAULT_DECORRELATED_MAX_INTERVAL: Duration = Duration::from_secs(30);

/// Decorrelated jitter: each delay is drawn at random from a range bounded
/// by a multiple of the previous one.
///
/// Clients that failed together drift apart quickly because every draw is
/// independent, while the upper end of the range still grows exponentially.
///
/// ```text
/// base(0) = initial
/// base(n) = uniform(min_interval, min(max(prev * factor, min_interval), max_interval))
/// delay(n) = jitter(clamp(base(n), min_interval, max_interval))
/// ```
///
/// `prev` is the pre-jitter base, so an additional jitter strategy never
/// distorts the growth. The range always has a finite ceiling: a config
/// without `max_interval` gets [`DEFAULT_DECORRELATED_MAX_INTERVAL`].
///
/// Unlike [`Exponential`](super::Exponential), a delay that lands exactly
/// on the elapsed budget is still allowed; only exceeding it stops the
/// sequence.
///
/// # Examples
///
/// ```rust
/// use backoffkit_core::config::BackoffConfig;
/// use backoffkit_core::retry::{Decorrelated, Sequence};
/// use std::time::Duration;
///
/// let config = BackoffConfig::builder()
///     .max_retries(5)
///     .seed(42)
///     .build();
/// let mut backoff = Decorrelated::new(Duration::from_millis(100), 3.0, config);
///
/// assert_eq!(backoff.next_delay(), Some(Duration::from_millis(100)));
/// for delay in backoff.iter() {
///     assert!(delay <= Duration::from_secs(30));
/// }
/// ```
#[derive(Debug)]
pub struct Decorrelated {
    config: BackoffConfig,
    initial: Duration,
    factor: f64,

    retries: u32,
    elapsed: Duration,
    prev: Duration,
}

impl Decorrelated {
    /// Create a decorrelated sequence starting at `initial`.
    ///
    /// A `factor` that is not greater than 1.0 (including NaN) is replaced by
    /// [`DEFAULT_DECORRELATED_FACTOR`]. A zero `max_interval` in `config` is
    /// replaced by [`DEFAULT_DECORRELATED_MAX_INTERVAL`].
    pub fn new(initial: Duration, factor: f64, mut config: BackoffConfig) -> Self {
        let factor = if factor > 1.0 {
            factor
        } else {
            DEFAULT_DECORRELATED_FACTOR
        };

        if config.max_interval.is_zero() {
            config.max_interval = DEFAULT_DECORRELATED_MAX_INTERVAL;
        }

        Self {
            config,
            initial,
            factor,
            retries: 0,
            elapsed: Duration::ZERO,
            prev: Duration::ZERO,
        }
    }

    /// The first delay.
    pub fn initial(&self) -> Duration {
        self.initial
    }

    /// The effective growth factor.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// The config this sequence was built with, including the forced ceiling.
    pub fn config(&self) -> &BackoffConfig {
        &self.config
    }

    fn next_base(&mut self) -> Duration {
        if self.retries == 0 || self.prev.is_zero() {
            return self.initial;
        }

        let low = self.config.min_interval;
        let mut high = scale_duration(self.prev, self.factor).max(low);
        if high > self.config.max_interval {
            high = self.config.max_interval;
        }
        uniform_between(self.config.rng.as_mut(), low, high)
    }
}

impl Sequence for Decorrelated {
    fn next_delay(&mut self) -> Option<Duration> {
        if self.config.retries_exhausted(self.retries) {
            trace_exhausted("decorrelated", "max_retries", self.retries, self.elapsed);
            return None;
        }

        let base = clamp_to_bounds(
            self.next_base(),
            self.config.min_interval,
            self.config.max_interval,
        );
        let delay = self.config.apply_jitter(base);

        if let Some(budget) = self.config.elapsed_budget()
            && self.elapsed.saturating_add(delay) > budget
        {
            trace_exhausted("decorrelated", "max_elapsed", self.retries, self.elapsed);
            return None;
        }

        self.retries = self.retries.saturating_add(1);
        self.elapsed = self.elapsed.saturating_add(delay);
        self.prev = base;
        trace_delay("decorrelated", delay, self.retries, self.elapsed);
        Some(delay)
    }

    fn reset(&mut self) {
        self.retries = 0;
        self.elapsed = Duration::ZERO;
        self.prev = Duration::ZERO;
    }

    fn retries(&self) -> u32 {
        self.retries
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
