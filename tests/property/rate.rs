// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Lazy Queue Rate Arithmetic

use cim_defer::Rate;
use proptest::prelude::*;

proptest! {
    /// Property: the timer granularity is a whole number of milliseconds
    /// no smaller than the requested interval
    #[test]
    fn prop_rounded_interval_is_ceiling(interval in 0.001f64..10_000.0) {
        let rate = Rate::from_interval(interval);

        prop_assert_eq!(rate.rounded_ms.fract(), 0.0);
        prop_assert!(rate.rounded_ms >= interval);
        prop_assert!(rate.rounded_ms - interval < 1.0);
    }

    /// Property: at least one call drains per tick
    #[test]
    fn prop_per_tick_is_positive(interval in any::<f64>()) {
        let rate = Rate::from_interval(interval);
        prop_assert!(rate.per_tick >= 1);
    }

    /// Property: whole-millisecond intervals drain one call per tick
    #[test]
    fn prop_whole_intervals_drain_one(interval in 1u32..100_000) {
        let rate = Rate::from_interval(f64::from(interval));

        prop_assert_eq!(rate.rounded_ms, f64::from(interval));
        prop_assert_eq!(rate.per_tick, 1);
    }

    /// Property: sub-millisecond intervals of 1/k drain k calls per tick
    #[test]
    fn prop_unit_fractions_drain_k(k in 1u32..64) {
        let rate = Rate::from_interval(1.0 / f64::from(k));

        prop_assert_eq!(rate.rounded_ms, 1.0);
        prop_assert_eq!(rate.per_tick, k as usize);
    }
}
