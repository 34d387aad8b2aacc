//! Jitter strategies layered on top of computed delays.
//!
//! Jitter spreads the retries of many clients that failed at the same moment
//! so they do not hit a recovering service in lock-step.
//!
//! # Built-in strategies
//!
//! - [`NoJitter`] - the delay is returned unchanged (the default)
//! - [`FullJitter`] - uniform in `[1ns, delay]`
//! - [`EqualJitter`] - `delay / 2` plus uniform in `[0, delay - delay / 2]`
//!
//! Any closure with the signature `Fn(Duration, &mut dyn RngCore) -> Duration`
//! is a custom strategy:
//!
//! ```rust
//! use backoffkit_core::retry::Jitter;
//! use rand::RngCore;
//! use std::time::Duration;
//!
//! let halve = |delay: Duration, _rng: &mut dyn RngCore| delay / 2;
//! let mut rng = rand::thread_rng();
//! assert_eq!(halve.apply(Duration::from_millis(100), &mut rng), Duration::from_millis(50));
//! ```

use super::bounds::duration_from_nanos;
use crate::error::SettingsError;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Maps a calculated delay and a random source to the delay actually used.
///
/// Implementations must not retain state between calls other than what the
/// random source itself carries, and should map a zero delay to zero.
pub trait Jitter: Send + Sync {
    /// Apply this strategy to `delay`.
    fn apply(&self, delay: Duration, rng: &mut dyn RngCore) -> Duration;
}

impl<F> Jitter for F
where
    F: Fn(Duration, &mut dyn RngCore) -> Duration + Send + Sync,
{
    fn apply(&self, delay: Duration, rng: &mut dyn RngCore) -> Duration {
        self(delay, rng)
    }
}

/// Identity strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn apply(&self, delay: Duration, _rng: &mut dyn RngCore) -> Duration {
        delay
    }
}

/// Randomizes the whole delay: uniform in `[1ns, delay]`.
///
/// Gives the widest spread, at the cost of occasionally very short waits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FullJitter;

impl Jitter for FullJitter {
    fn apply(&self, delay: Duration, rng: &mut dyn RngCore) -> Duration {
        let nanos = delay.as_nanos();
        if nanos == 0 {
            return Duration::ZERO;
        }
        duration_from_nanos(rng.gen_range(1..=nanos))
    }
}

/// Keeps half the delay and randomizes the other half.
///
/// The result always lies in `[delay / 2, delay]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EqualJitter;

impl Jitter for EqualJitter {
    fn apply(&self, delay: Duration, rng: &mut dyn RngCore) -> Duration {
        if delay.is_zero() {
            return Duration::ZERO;
        }
        let half = delay / 2;
        let rest = (delay - half).as_nanos();
        half + duration_from_nanos(rng.gen_range(0..=rest))
    }
}

/// Named selector for the built-in strategies.
///
/// Used by declarative settings, where a strategy has to be picked by name.
///
/// ```rust
/// use backoffkit_core::retry::JitterKind;
///
/// let kind: JitterKind = "Equal".parse().unwrap();
/// assert_eq!(kind, JitterKind::Equal);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JitterKind {
    /// [`NoJitter`].
    #[default]
    None,
    /// [`FullJitter`].
    Full,
    /// [`EqualJitter`].
    Equal,
}

impl JitterKind {
    /// Instantiate the strategy this kind names.
    pub fn strategy(self) -> Arc<dyn Jitter> {
        match self {
            JitterKind::None => Arc::new(NoJitter),
            JitterKind::Full => Arc::new(FullJitter),
            JitterKind::Equal => Arc::new(EqualJitter),
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            JitterKind::None => "none",
            JitterKind::Full => "full",
            JitterKind::Equal => "equal",
        }
    }
}

impl fmt::Display for JitterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JitterKind {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(JitterKind::None),
            "full" => Ok(JitterKind::Full),
            "equal" => Ok(JitterKind::Equal),
            other => Err(SettingsError::UnknownJitter(other.to_string())),
        }
    }
}
