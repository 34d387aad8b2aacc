//! Duration arithmetic shared by every sequence.
//!
//! All helpers work on `std::time::Duration`, so a result can never be
//! negative. Multiplication saturates at [`Duration::MAX`] instead of
//! panicking.

use rand::{Rng, RngCore};
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Clamp `delay` into `[min, max]`.
///
/// A zero bound is disabled. The floor is applied before the ceiling, so if
/// both bounds are enabled and `min > max`, the ceiling wins.
///
/// # Examples
///
/// ```rust
/// use backoffkit_core::retry::clamp_to_bounds;
/// use std::time::Duration;
///
/// let ms = Duration::from_millis;
/// assert_eq!(clamp_to_bounds(ms(5), ms(10), ms(100)), ms(10));
/// assert_eq!(clamp_to_bounds(ms(500), ms(10), ms(100)), ms(100));
/// assert_eq!(clamp_to_bounds(ms(100), Duration::ZERO, Duration::ZERO), ms(100));
/// ```
pub fn clamp_to_bounds(delay: Duration, min: Duration, max: Duration) -> Duration {
    let mut delay = delay;
    if !min.is_zero() && delay < min {
        delay = min;
    }
    if !max.is_zero() && delay > max {
        delay = max;
    }
    delay
}

/// Pick a uniformly distributed duration in `[low, high]` (inclusive).
///
/// Returns `low` when the range is empty or inverted.
///
/// # Examples
///
/// ```rust
/// use backoffkit_core::retry::uniform_between;
/// use std::time::Duration;
///
/// let mut rng = rand::thread_rng();
/// let low = Duration::from_millis(500);
/// assert_eq!(uniform_between(&mut rng, low, Duration::from_millis(100)), low);
/// ```
pub fn uniform_between(rng: &mut dyn RngCore, low: Duration, high: Duration) -> Duration {
    if high <= low {
        return low;
    }
    let span = (high - low).as_nanos();
    low + duration_from_nanos(rng.gen_range(0..=span))
}

/// Multiply `delay` by `factor`, saturating at [`Duration::MAX`].
///
/// The product is computed in floating point on nanoseconds and checked
/// before a `Duration` is built, so it never wraps or panics. Non-finite
/// products saturate; non-positive ones collapse to zero.
pub fn scale_duration(delay: Duration, factor: f64) -> Duration {
    let nanos = delay.as_nanos() as f64 * factor;
    if nanos.is_nan() || nanos <= 0.0 {
        return Duration::ZERO;
    }
    if nanos >= Duration::MAX.as_nanos() as f64 {
        return Duration::MAX;
    }
    duration_from_nanos(nanos as u128)
}

/// Build a duration from a nanosecond count wider than `u64`.
pub(crate) fn duration_from_nanos(nanos: u128) -> Duration {
    if nanos >= Duration::MAX.as_nanos() {
        return Duration::MAX;
    }
    // Both casts are lossless below Duration::MAX.
    Duration::new(
        (nanos / NANOS_PER_SEC) as u64,
        (nanos % NANOS_PER_SEC) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_clamp_to_bounds_table() {
        let cases = [
            ("within bounds", ms(100), ms(50), ms(200), ms(100)),
            ("below minimum", ms(30), ms(50), ms(200), ms(50)),
            ("above maximum", ms(300), ms(50), ms(200), ms(200)),
            ("zero input floored to min", Duration::ZERO, ms(10), ms(100), ms(10)),
            ("zero min", ms(100), Duration::ZERO, ms(200), ms(100)),
            ("zero max", ms(100), ms(50), Duration::ZERO, ms(100)),
            ("zero bounds", ms(100), Duration::ZERO, Duration::ZERO, ms(100)),
            ("inverted bounds favour max", ms(10), ms(300), ms(200), ms(200)),
        ];

        for (name, delay, min, max, expected) in cases {
            assert_eq!(
                clamp_to_bounds(delay, min, max),
                expected,
                "case '{}': clamp_to_bounds({:?}, {:?}, {:?})",
                name,
                delay,
                min,
                max
            );
        }
    }

    #[test]
    fn test_uniform_between_normal_range() {
        let mut rng = Pcg64::new(42, 1024);
        let (low, high) = (ms(100), ms(500));

        for _ in 0..100 {
            let value = uniform_between(&mut rng, low, high);
            assert!(
                (low..=high).contains(&value),
                "{:?} outside [{:?}, {:?}]",
                value,
                low,
                high
            );
        }
    }

    #[test]
    fn test_uniform_between_degenerate_ranges() {
        let mut rng = Pcg64::new(42, 1024);

        assert_eq!(uniform_between(&mut rng, ms(100), ms(100)), ms(100));
        assert_eq!(uniform_between(&mut rng, ms(500), ms(100)), ms(500));
        assert_eq!(
            uniform_between(&mut rng, Duration::ZERO, Duration::ZERO),
            Duration::ZERO
        );
    }

    #[test]
    fn test_uniform_between_reaches_both_ends_of_tiny_range() {
        let mut rng = Pcg64::seed_from_u64(7);
        let low = Duration::from_nanos(10);
        let high = Duration::from_nanos(11);

        let draws: Vec<_> = (0..200).map(|_| uniform_between(&mut rng, low, high)).collect();
        assert!(draws.contains(&low));
        assert!(draws.contains(&high));
    }

    #[test]
    fn test_scale_duration_exact_for_integral_factors() {
        assert_eq!(scale_duration(ms(10), 2.0), ms(20));
        assert_eq!(scale_duration(ms(40), 2.0), ms(80));
        assert_eq!(scale_duration(ms(100), 1.5), ms(150));
    }

    #[test]
    fn test_scale_duration_saturates() {
        assert_eq!(scale_duration(Duration::MAX, 2.0), Duration::MAX);
        assert_eq!(
            scale_duration(Duration::from_secs(1), f64::INFINITY),
            Duration::MAX
        );
        assert_eq!(scale_duration(ms(10), f64::NAN), Duration::ZERO);
        assert_eq!(scale_duration(ms(10), -1.0), Duration::ZERO);
    }

    #[test]
    fn test_duration_from_nanos_splits_seconds() {
        assert_eq!(duration_from_nanos(1_500_000_000), ms(1500));
        assert_eq!(duration_from_nanos(u128::MAX), Duration::MAX);
    }

    proptest! {
        #[test]
        fn prop_clamp_respects_enabled_bounds(
            delay in 0u64..10_000,
            min in 0u64..5_000,
            span in 0u64..5_000,
        ) {
            let max = min + span;
            let clamped = clamp_to_bounds(ms(delay), ms(min), ms(max));

            if min > 0 {
                prop_assert!(clamped >= ms(min));
            }
            if max > 0 {
                prop_assert!(clamped <= ms(max));
            }
        }

        #[test]
        fn prop_uniform_between_stays_in_range(
            seed in any::<u64>(),
            low in 0u64..1_000_000,
            span in 0u64..1_000_000,
        ) {
            let mut rng = Pcg64::seed_from_u64(seed);
            let (low, high) = (Duration::from_nanos(low), Duration::from_nanos(low + span));
            let value = uniform_between(&mut rng, low, high);

            prop_assert!(value >= low && value <= high);
        }
    }
}
