//! Shared tunables read by every sequence.

use crate::retry::{EqualJitter, Jitter, JitterKind, NoJitter};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// PCG state used by the default random source.
pub const DEFAULT_SEED_STATE: u128 = 42;

/// PCG stream used by the default random source.
pub const DEFAULT_SEED_STREAM: u128 = 1024;

/// Limits, bounds, jitter and random source for one sequence.
///
/// A config is moved into the sequence that uses it, so every sequence owns
/// its random source and no state is shared between retry episodes.
///
/// # Defaults
///
/// - `max_retries`: unlimited
/// - `max_elapsed`: unlimited (`Duration::ZERO`)
/// - `min_interval` / `max_interval`: disabled (`Duration::ZERO`)
/// - `jitter`: [`NoJitter`]
/// - random source: PCG64 seeded with ([`DEFAULT_SEED_STATE`], [`DEFAULT_SEED_STREAM`]),
///   so two default configs draw identical random values
///
/// # Examples
///
/// ```rust
/// use backoffkit_core::config::BackoffConfig;
/// use backoffkit_core::retry::FullJitter;
/// use std::time::Duration;
///
/// let config = BackoffConfig::builder()
///     .max_retries(5)
///     .max_elapsed(Duration::from_secs(30))
///     .max_interval(Duration::from_secs(5))
///     .jitter_strategy(FullJitter)
///     .seed(7)
///     .build();
///
/// assert_eq!(config.max_retries(), Some(5));
/// ```
pub struct BackoffConfig {
    pub(crate) max_retries: Option<u32>,
    pub(crate) max_elapsed: Duration,
    pub(crate) min_interval: Duration,
    pub(crate) max_interval: Duration,
    pub(crate) jitter: Arc<dyn Jitter>,
    pub(crate) rng: Box<dyn RngCore + Send>,
}

impl BackoffConfig {
    /// Create a new builder.
    pub fn builder() -> BackoffConfigBuilder {
        BackoffConfigBuilder::default()
    }

    /// Retry limit; `None` means unlimited.
    pub fn max_retries(&self) -> Option<u32> {
        self.max_retries
    }

    /// Elapsed-time budget; zero means unlimited.
    pub fn max_elapsed(&self) -> Duration {
        self.max_elapsed
    }

    /// Delay floor; zero means disabled.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Delay ceiling; zero means disabled.
    pub fn max_interval(&self) -> Duration {
        self.max_interval
    }

    /// The configured jitter strategy.
    pub fn jitter(&self) -> &Arc<dyn Jitter> {
        &self.jitter
    }

    /// Whether `retries` productions already used up the retry limit.
    pub(crate) fn retries_exhausted(&self, retries: u32) -> bool {
        matches!(self.max_retries, Some(max) if retries >= max)
    }

    /// The elapsed budget, if one is set.
    pub(crate) fn elapsed_budget(&self) -> Option<Duration> {
        (!self.max_elapsed.is_zero()).then_some(self.max_elapsed)
    }

    /// Run the jitter strategy against this config's random source.
    pub(crate) fn apply_jitter(&mut self, delay: Duration) -> Duration {
        self.jitter.apply(delay, self.rng.as_mut())
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        BackoffConfigBuilder::default().build()
    }
}

impl fmt::Debug for BackoffConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackoffConfig")
            .field("max_retries", &self.max_retries)
            .field("max_elapsed", &self.max_elapsed)
            .field("min_interval", &self.min_interval)
            .field("max_interval", &self.max_interval)
            .finish_non_exhaustive()
    }
}

/// Default random source: PCG64 with a fixed seed.
pub fn default_rng() -> Pcg64 {
    Pcg64::new(DEFAULT_SEED_STATE, DEFAULT_SEED_STREAM)
}

/// Builder for [`BackoffConfig`].
///
/// Unset options fall back to the defaults documented on [`BackoffConfig`].
#[derive(Default)]
pub struct BackoffConfigBuilder {
    max_retries: Option<u32>,
    max_elapsed: Option<Duration>,
    min_interval: Option<Duration>,
    max_interval: Option<Duration>,
    jitter: Option<Arc<dyn Jitter>>,
    rng: Option<Box<dyn RngCore + Send>>,
}

impl BackoffConfigBuilder {
    /// Allow at most `max_retries` delays. `0` stops immediately.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Signed retry limit: any negative value means unlimited.
    ///
    /// Values beyond `u32::MAX` saturate.
    ///
    /// ```rust
    /// use backoffkit_core::config::BackoffConfig;
    ///
    /// let config = BackoffConfig::builder().max_retries_signed(-1).build();
    /// assert_eq!(config.max_retries(), None);
    /// ```
    pub fn max_retries_signed(mut self, max_retries: i64) -> Self {
        self.max_retries = if max_retries < 0 {
            None
        } else {
            Some(u32::try_from(max_retries).unwrap_or(u32::MAX))
        };
        self
    }

    /// Remove any retry limit set earlier.
    pub fn unlimited_retries(mut self) -> Self {
        self.max_retries = None;
        self
    }

    /// Stop once the sum of produced delays reaches `max_elapsed`.
    ///
    /// `Duration::ZERO` disables the budget.
    pub fn max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.max_elapsed = Some(max_elapsed);
        self
    }

    /// Never produce a delay shorter than `min_interval`.
    ///
    /// Ignored by [`Constant`](crate::retry::Constant).
    pub fn min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = Some(min_interval);
        self
    }

    /// Never produce a delay longer than `max_interval`.
    ///
    /// Ignored by [`Constant`](crate::retry::Constant).
    pub fn max_interval(mut self, max_interval: Duration) -> Self {
        self.max_interval = Some(max_interval);
        self
    }

    /// Shortcut for [`EqualJitter`].
    pub fn with_jitter(self) -> Self {
        self.jitter_strategy(EqualJitter)
    }

    /// Use a custom jitter strategy.
    pub fn jitter_strategy<J>(mut self, jitter: J) -> Self
    where
        J: Jitter + 'static,
    {
        self.jitter = Some(Arc::new(jitter));
        self
    }

    /// Use a jitter strategy that is already shared.
    pub fn shared_jitter(mut self, jitter: Arc<dyn Jitter>) -> Self {
        self.jitter = Some(jitter);
        self
    }

    /// Use one of the built-in strategies by name.
    pub fn jitter_kind(self, kind: JitterKind) -> Self {
        self.shared_jitter(kind.strategy())
    }

    /// Seed the default PCG64 random source.
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Some(Box::new(Pcg64::seed_from_u64(seed)));
        self
    }

    /// Inject a random source.
    pub fn rng<R>(mut self, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Build the config.
    pub fn build(self) -> BackoffConfig {
        BackoffConfig {
            max_retries: self.max_retries,
            max_elapsed: self.max_elapsed.unwrap_or(Duration::ZERO),
            min_interval: self.min_interval.unwrap_or(Duration::ZERO),
            max_interval: self.max_interval.unwrap_or(Duration::ZERO),
            jitter: self.jitter.unwrap_or_else(|| Arc::new(NoJitter)),
            rng: self.rng.unwrap_or_else(|| Box::new(default_rng())),
        }
    }
}
