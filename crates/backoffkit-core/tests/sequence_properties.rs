//! Behavioral properties of the public sequence API.

use backoffkit_core::prelude::*;
use backoffkit_core::retry::{DEFAULT_DECORRELATED_FACTOR, clamp_to_bounds, uniform_between};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::time::Duration;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn test_constant_retry_cycle() {
    let config = BackoffConfig::builder().max_retries(3).build();
    let mut backoff = Constant::new(ms(100), config);

    for _ in 0..3 {
        assert_eq!(backoff.next_delay(), Some(ms(100)));
    }
    assert_eq!(backoff.next_delay(), None);

    backoff.reset();
    assert_eq!(backoff.next_delay(), Some(ms(100)));
}

#[test]
fn test_exponential_without_limits() {
    let mut backoff = Exponential::new(ms(10), 2.0, BackoffConfig::default());
    let delays: Vec<_> = backoff.iter().take(4).collect();

    assert_eq!(delays, vec![ms(10), ms(20), ms(40), ms(80)]);
}

#[test]
fn test_exponential_fourth_call_capped() {
    let config = BackoffConfig::builder().max_interval(ms(50)).build();
    let mut backoff = Exponential::new(ms(10), 2.0, config);

    assert_eq!(backoff.iter().nth(3), Some(ms(50)));
}

#[test]
fn test_decorrelated_never_exceeds_default_ceiling() {
    let config = BackoffConfig::builder().seed(42).build();
    let mut backoff = Decorrelated::new(ms(100), 3.0, config);

    assert_eq!(backoff.next_delay(), Some(ms(100)));
    for delay in backoff.iter().take(500) {
        assert!(delay <= Duration::from_secs(30));
    }
}

#[test]
fn test_decorrelated_factor_normalizes() {
    let backoff = Decorrelated::new(ms(100), 0.5, BackoffConfig::default());
    assert_eq!(backoff.factor(), DEFAULT_DECORRELATED_FACTOR);
}

#[test]
fn test_elapsed_comparison_differs_between_algorithms() {
    // Both sequences would produce 100ms first; the budget is exactly 100ms.
    let budget = || BackoffConfig::builder().max_elapsed(ms(100)).build();

    let mut exponential = Exponential::new(ms(100), 2.0, budget());
    let mut decorrelated = Decorrelated::new(ms(100), 3.0, budget());

    assert_eq!(exponential.next_delay(), None);
    assert_eq!(decorrelated.next_delay(), Some(ms(100)));
}

#[test]
fn test_helpers_edge_cases() {
    let mut rng = Pcg64::seed_from_u64(1);

    assert_eq!(clamp_to_bounds(Duration::ZERO, ms(10), ms(100)), ms(10));
    assert_eq!(clamp_to_bounds(ms(100), Duration::ZERO, Duration::ZERO), ms(100));
    assert_eq!(uniform_between(&mut rng, ms(500), ms(100)), ms(500));
}

#[test]
fn test_custom_jitter_through_config() {
    let shave = |delay: Duration, _: &mut dyn rand::RngCore| delay.saturating_sub(ms(1));
    let config = BackoffConfig::builder().jitter_strategy(shave).build();
    let mut backoff = Exponential::new(ms(10), 2.0, config);

    // 10 - 1 = 9, then 9 * 2 - 1 = 17
    assert_eq!(backoff.next_delay(), Some(ms(9)));
    assert_eq!(backoff.next_delay(), Some(ms(17)));
}

#[test]
fn test_settings_and_builder_agree() {
    let settings = BackoffSettings::from_toml_str(
        r#"
        kind = "decorrelated"
        initial_ms = 20
        factor = 2.5
        max_retries = 10
        jitter = "full"
        seed = 77
        "#,
    )
    .unwrap();

    let from_settings: Vec<_> = settings.build().unwrap().iter().collect();

    let config = BackoffConfig::builder()
        .max_retries(10)
        .jitter_strategy(FullJitter)
        .seed(77)
        .build();
    let from_builder: Vec<_> = Decorrelated::new(ms(20), 2.5, config).iter().collect();

    assert_eq!(from_settings.len(), 10);
    assert_eq!(from_settings, from_builder);
}

fn jittered(kind: JitterKind, seed: u64) -> Vec<Duration> {
    let config = BackoffConfig::builder()
        .jitter_kind(kind)
        .seed(seed)
        .max_retries(12)
        .build();
    Exponential::new(ms(5), 1.7, config).iter().collect()
}

proptest! {
    #[test]
    fn prop_identical_seeds_identical_sequences(seed in any::<u64>()) {
        prop_assert_eq!(jittered(JitterKind::Full, seed), jittered(JitterKind::Full, seed));
        prop_assert_eq!(jittered(JitterKind::Equal, seed), jittered(JitterKind::Equal, seed));
    }

    #[test]
    fn prop_elapsed_never_exceeds_budget(
        seed in any::<u64>(),
        initial in 1u64..500,
        budget in 1u64..20_000,
    ) {
        let config = BackoffConfig::builder()
            .max_elapsed(ms(budget))
            .min_interval(ms(1))
            .seed(seed)
            .build();
        let mut decorrelated = Decorrelated::new(ms(initial), 3.0, config);
        let total: Duration = decorrelated.iter().sum();
        prop_assert!(total <= ms(budget));

        let config = BackoffConfig::builder()
            .max_elapsed(ms(budget))
            .jitter_kind(JitterKind::Equal)
            .seed(seed)
            .build();
        let mut exponential = Exponential::new(ms(initial), 2.0, config);
        let total: Duration = exponential.iter().take(64).sum();
        prop_assert!(total < ms(budget));
    }
}
