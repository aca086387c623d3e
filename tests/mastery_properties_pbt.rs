//! Property-based tests for the mastery estimator.
//!
//! - Clamp: results always stay in [0, 1]
//! - Monotonicity in the task score while no tolerance branch applies
//! - Ceiling dominance: repeated perfect scores converge to the tier cap from below
//! - Slip/guess factors scale the delta exactly

use proptest::prelude::*;

use astra_mentor::mastery::{
    DifficultyTier, MasteryConfig, MasteryEstimator, ToleranceKind, UpdateStrategy,
};

fn arb_tier() -> impl Strategy<Value = DifficultyTier> {
    prop_oneof![
        Just(DifficultyTier::Concept),
        Just(DifficultyTier::BasicCode),
        Just(DifficultyTier::Advanced),
    ]
}

fn arb_strategy() -> impl Strategy<Value = UpdateStrategy> {
    prop_oneof![
        Just(UpdateStrategy::Enhanced),
        Just(UpdateStrategy::Legacy),
        Just(UpdateStrategy::ExpertGuard),
    ]
}

fn arb_unit() -> impl Strategy<Value = f64> {
    (0u64..=10_000u64).prop_map(|v| v as f64 / 10_000.0)
}

fn arb_days() -> impl Strategy<Value = Option<f64>> {
    proptest::option::of(0.0f64..400.0)
}

proptest! {
    #[test]
    fn prop_result_within_unit_interval(
        old in -2.0f64..3.0,
        score in -2.0f64..3.0,
        tier in arb_tier(),
        strategy in arb_strategy(),
        days in arb_days(),
    ) {
        let estimator = MasteryEstimator::default();
        let result = estimator.estimate_with(strategy, old, score, tier, days);
        prop_assert!((0.0..=1.0).contains(&result.new_mastery));
        prop_assert!((0.0..=1.0).contains(&result.old_mastery));
        prop_assert!((0.0..=1.0).contains(&result.task_score));
    }

    #[test]
    fn prop_monotone_in_score_outside_tolerance(
        old in 0.31f64..0.69,
        s1 in arb_unit(),
        s2 in arb_unit(),
        tier in arb_tier(),
        days in arb_days(),
    ) {
        let estimator = MasteryEstimator::default();
        let (lo, hi) = if s1 <= s2 { (s1, s2) } else { (s2, s1) };
        let a = estimator.estimate(old, lo, tier, days);
        let b = estimator.estimate(old, hi, tier, days);
        prop_assert_eq!(a.tolerance, ToleranceKind::None);
        prop_assert_eq!(b.tolerance, ToleranceKind::None);
        prop_assert!(a.new_mastery <= b.new_mastery);
    }

    #[test]
    fn prop_never_exceeds_cap_from_below(
        start in arb_unit(),
        tier in arb_tier(),
        rounds in 1usize..60,
    ) {
        let estimator = MasteryEstimator::default();
        let cap = estimator.config().ceilings.cap(tier);
        prop_assume!(start < cap);

        let mut mastery = start;
        for _ in 0..rounds {
            let next = estimator.estimate(mastery, 1.0, tier, None).new_mastery;
            prop_assert!(next <= cap);
            prop_assert!(next >= mastery);
            mastery = next;
        }
    }

    #[test]
    fn prop_slip_scales_delta_by_half(
        old in 0.7f64..=1.0,
        score in 0.0f64..0.5,
    ) {
        let protected = MasteryEstimator::default();
        let mut config = MasteryConfig::default();
        config.tolerance.slip_protection = 1.0;
        let undamped = MasteryEstimator::new(config);

        let a = protected.estimate(old, score, DifficultyTier::Advanced, None);
        let b = undamped.estimate(old, score, DifficultyTier::Advanced, None);
        prop_assert_eq!(a.tolerance, ToleranceKind::Slip);
        // both sides are rounded to 4 digits
        prop_assert!((a.improvement - 0.5 * b.improvement).abs() <= 1e-4);
    }
}

#[test]
fn slip_example_is_exactly_half() {
    let protected = MasteryEstimator::default();
    let mut config = MasteryConfig::default();
    config.tolerance.slip_protection = 1.0;
    let undamped = MasteryEstimator::new(config);

    let a = protected.estimate(0.9, 0.3, DifficultyTier::Advanced, None);
    let b = undamped.estimate(0.9, 0.3, DifficultyTier::Advanced, None);
    assert!((a.improvement / b.improvement - 0.5).abs() < 1e-6);
}

#[test]
fn guess_example_is_sixty_percent() {
    let damped = MasteryEstimator::default();
    let mut config = MasteryConfig::default();
    config.tolerance.guess_dampening = 1.0;
    let undamped = MasteryEstimator::new(config);

    let a = damped.estimate(0.1, 0.95, DifficultyTier::Advanced, None);
    let b = undamped.estimate(0.1, 0.95, DifficultyTier::Advanced, None);
    assert_eq!(a.tolerance, ToleranceKind::Guess);
    assert!((a.improvement / b.improvement - 0.6).abs() < 1e-6);
}

#[test]
fn grace_period_boundary() {
    let estimator = MasteryEstimator::default();
    assert_eq!(estimator.decay_factor(Some(7.0)), 1.0);
    assert!((estimator.decay_factor(Some(8.0)) - 0.98).abs() < 1e-12);

    let at_grace = estimator.estimate(0.6, 0.5, DifficultyTier::BasicCode, Some(7.0));
    let fresh = estimator.estimate(0.6, 0.5, DifficultyTier::BasicCode, None);
    assert_eq!(at_grace.new_mastery, fresh.new_mastery);
}

#[test]
fn extremes_stay_clamped() {
    let estimator = MasteryEstimator::default();
    for tier in DifficultyTier::ALL {
        let up = estimator.estimate(0.0, 1.0, tier, None);
        let down = estimator.estimate(1.0, 0.0, tier, Some(365.0));
        assert!((0.0..=1.0).contains(&up.new_mastery));
        assert!((0.0..=1.0).contains(&down.new_mastery));
    }
}
