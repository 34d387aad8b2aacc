//! The interface shared by every delay sequence.

use std::time::Duration;

/// A stateful generator of retry delays for one retry episode.
///
/// Implementations decide how long to wait before the next retry and when to
/// give up. They never sleep; the caller waits for the returned delay and
/// re-invokes its operation.
///
/// A sequence is owned by a single caller and mutated through `&mut self`.
/// Concurrent producers should each build their own sequence.
///
/// # Examples
///
/// ```rust
/// use backoffkit_core::config::BackoffConfig;
/// use backoffkit_core::retry::{Exponential, Sequence};
/// use std::time::Duration;
///
/// let config = BackoffConfig::builder().max_retries(3).build();
/// let mut backoff = Exponential::new(Duration::from_millis(100), 2.0, config);
///
/// while let Some(delay) = backoff.next_delay() {
///     // sleep for `delay`, then retry the operation
///     # let _ = delay;
/// }
///
/// // Start a new episode
/// backoff.reset();
/// assert_eq!(backoff.next_delay(), Some(Duration::from_millis(100)));
/// ```
pub trait Sequence {
    /// Produce the next delay.
    ///
    /// # Returns
    /// - `Some(Duration)`: wait this long, then retry
    /// - `None`: the retry or elapsed budget is exhausted; stop retrying
    ///
    /// A `None` leaves the state untouched.
    fn next_delay(&mut self) -> Option<Duration>;

    /// Restore the freshly constructed state.
    ///
    /// Clears the retry count, elapsed time and any memory of previous
    /// delays. The random source keeps its position.
    fn reset(&mut self);

    /// Number of delays produced since construction or the last reset.
    fn retries(&self) -> u32;

    /// Sum of the delays produced since construction or the last reset.
    fn elapsed(&self) -> Duration;

    /// Iterate over the remaining delays.
    ///
    /// The iterator ends at the first `None`.
    ///
    /// ```rust
    /// use backoffkit_core::config::BackoffConfig;
    /// use backoffkit_core::retry::{Constant, Sequence};
    /// use std::time::Duration;
    ///
    /// let config = BackoffConfig::builder().max_retries(3).build();
    /// let mut backoff = Constant::new(Duration::from_millis(50), config);
    ///
    /// let total: Duration = backoff.iter().sum();
    /// assert_eq!(total, Duration::from_millis(150));
    /// ```
    fn iter(&mut self) -> SequenceIter<'_, Self>
    where
        Self: Sized,
    {
        SequenceIter { sequence: self }
    }
}

impl<S> Sequence for Box<S>
where
    S: Sequence + ?Sized,
{
    fn next_delay(&mut self) -> Option<Duration> {
        (**self).next_delay()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn retries(&self) -> u32 {
        (**self).retries()
    }

    fn elapsed(&self) -> Duration {
        (**self).elapsed()
    }
}

/// Iterator over the delays of a [`Sequence`].
///
/// Returned by [`Sequence::iter`].
#[derive(Debug)]
pub struct SequenceIter<'a, S: ?Sized> {
    sequence: &'a mut S,
}

impl<S> Iterator for SequenceIter<'_, S>
where
    S: Sequence + ?Sized,
{
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        self.sequence.next_delay()
    }
}

#[cfg(feature = "tracing")]
pub(crate) fn trace_delay(kind: &'static str, delay: Duration, retries: u32, elapsed: Duration) {
    tracing::trace!(kind, ?delay, retries, ?elapsed, "backoff delay produced");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn trace_delay(_kind: &'static str, _delay: Duration, _retries: u32, _elapsed: Duration) {}

#[cfg(feature = "tracing")]
pub(crate) fn trace_exhausted(kind: &'static str, reason: &'static str, retries: u32, elapsed: Duration) {
    tracing::debug!(kind, reason, retries, ?elapsed, "backoff sequence exhausted");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn trace_exhausted(
    _kind: &'static str,
    _reason: &'static str,
    _retries: u32,
    _elapsed: Duration,
) {
}
