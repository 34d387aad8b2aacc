//! Retry delay sequences and jitter strategies.
//!
//! This module answers one question for a retrying client: "should I retry,
//! and if so after how long?". It never sleeps; the caller does.
//!
//! # Key Types
//!
//! - [`Sequence`] - Core trait for delay generators
//! - [`Constant`] - Fixed delay, no jitter or bounds
//! - [`Exponential`] - Delay multiplied by a factor each retry
//! - [`Decorrelated`] - Random delay bounded by a multiple of the previous one
//! - [`Jitter`] - Randomization layered on computed delays
//!
//! # Examples
//!
//! ```rust
//! use backoffkit_core::config::BackoffConfig;
//! use backoffkit_core::retry::{Exponential, Sequence};
//! use std::time::Duration;
//!
//! let config = BackoffConfig::builder()
//!     .max_retries(3)
//!     .with_jitter()
//!     .build();
//! let mut backoff = Exponential::new(Duration::from_millis(100), 2.0, config);
//!
//! let mut attempts = 0;
//! while let Some(delay) = backoff.next_delay() {
//!     attempts += 1;
//!     assert!(delay <= Duration::from_millis(400));
//! }
//! assert_eq!(attempts, 3);
//! ```

mod bounds;
mod constant;
mod decorrelated;
mod exponential;
mod jitter;
mod strategy;

pub use bounds::{clamp_to_bounds, scale_duration, uniform_between};
pub use constant::Constant;
pub use decorrelated::{
    DEFAULT_DECORRELATED_FACTOR, DEFAULT_DECORRELATED_MAX_INTERVAL, Decorrelated,
};
pub use exponential::{DEFAULT_EXPONENTIAL_FACTOR, Exponential};
pub use jitter::{EqualJitter, FullJitter, Jitter, JitterKind, NoJitter};
pub use strategy::{Sequence, SequenceIter};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackoffConfig;
    use std::time::Duration;

    fn all_sequences() -> Vec<(&'static str, Box<dyn Sequence + Send>)> {
        let interval = Duration::from_millis(100);
        let constant: Box<dyn Sequence + Send> =
            Box::new(Constant::new(interval, BackoffConfig::default()));
        let exponential: Box<dyn Sequence + Send> =
            Box::new(Exponential::new(interval, 2.0, BackoffConfig::default()));
        let decorrelated: Box<dyn Sequence + Send> =
            Box::new(Decorrelated::new(interval, 3.0, BackoffConfig::default()));

        vec![
            ("constant", constant),
            ("exponential", exponential),
            ("decorrelated", decorrelated),
        ]
    }

    #[test]
    fn test_sequence_interface() {
        for (name, mut sequence) in all_sequences() {
            let first = sequence.next_delay();
            assert!(
                matches!(first, Some(d) if d > Duration::ZERO),
                "{}: first delay {:?}",
                name,
                first
            );

            sequence.reset();
            assert_eq!(sequence.retries(), 0, "{}", name);
            assert_eq!(sequence.elapsed(), Duration::ZERO, "{}", name);

            let again = sequence.next_delay();
            assert_eq!(again, first, "{}: first delay after reset", name);
        }
    }

    #[test]
    fn test_counters_track_returned_delays() {
        for (name, mut sequence) in all_sequences() {
            let mut total = Duration::ZERO;
            for call in 1..=10u32 {
                let delay = sequence.next_delay().unwrap();
                total += delay;
                assert_eq!(sequence.retries(), call, "{}", name);
                assert_eq!(sequence.elapsed(), total, "{}", name);
            }
        }
    }

    #[test]
    fn test_sequences_are_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Constant>();
        assert_send::<Exponential>();
        assert_send::<Decorrelated>();
    }
}
