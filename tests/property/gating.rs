// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Counted Gates, Memoization and Pre-binding

use cim_defer::defer::{after, fill, memoize, merge_args, once};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Strategies
// ============================================================================

/// Argument template: `None` is a hole
fn template() -> impl Strategy<Value = Vec<Option<i32>>> {
    prop::collection::vec(prop::option::of(-1000i32..1000), 0..12)
}

fn call_args() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-1000i32..1000, 0..12)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: `after(n)` fires exactly once per `n` calls
    ///
    /// The `n`th call releases every gathered argument in call order;
    /// `n - 1` calls never release anything.
    #[test]
    fn prop_after_fires_on_nth_call(n in 1usize..40) {
        let released = Arc::new(Mutex::new(Vec::new()));
        let released_clone = released.clone();
        let gate = after(move |batch: Vec<usize>| released_clone.lock().unwrap().push(batch), n);

        for i in 0..n - 1 {
            prop_assert!(gate.call(i).is_none());
        }
        prop_assert!(released.lock().unwrap().is_empty());

        prop_assert!(gate.call(n - 1).is_some());
        let released = released.lock().unwrap();
        prop_assert_eq!(released.len(), 1);
        prop_assert_eq!(&released[0], &(0..n).collect::<Vec<_>>());
    }

    /// Property: release count is `calls / n`, leftover is `calls % n`
    #[test]
    fn prop_after_counts_cycles(n in 1usize..10, calls in 0usize..100) {
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();
        let gate = after(move |_: Vec<()>| { fired_clone.fetch_add(1, Ordering::SeqCst); }, n);

        for _ in 0..calls {
            gate.call(());
        }

        prop_assert_eq!(fired.load(Ordering::SeqCst), calls / n);
        prop_assert_eq!(gate.count(), calls % n);
    }

    /// Property: merging never loses a call argument
    ///
    /// The result is at least as long as the template, and every literal in
    /// the template keeps its position.
    #[test]
    fn prop_fill_keeps_literals_in_place(template in template(), args in call_args()) {
        let holes = template.iter().filter(|slot| slot.is_none()).count();
        let merged = merge_args(&template, args.clone());

        prop_assert_eq!(merged.len(), template.len() + args.len().saturating_sub(holes));
        for (i, slot) in template.iter().enumerate() {
            if let Some(value) = slot {
                prop_assert_eq!(merged[i], *value);
            }
        }
    }

    /// Property: call arguments appear in order, holes first, then the tail
    #[test]
    fn prop_fill_consumes_arguments_in_order(template in template(), args in call_args()) {
        let filled = fill(|merged: Vec<i32>| merged, template.clone());
        let merged = filled.call(args.clone());

        let hole_values: Vec<i32> = template
            .iter()
            .zip(merged.iter())
            .filter(|(slot, _)| slot.is_none())
            .map(|(_, value)| *value)
            .collect();
        let tail = &merged[template.len()..];

        let used: Vec<i32> = hole_values
            .into_iter()
            .take(args.len())
            .chain(tail.iter().copied())
            .collect();
        prop_assert_eq!(used, args);
    }

    /// Property: memoize computes each distinct argument exactly once
    #[test]
    fn prop_memoize_computes_each_key_once(inputs in prop::collection::vec(0u8..16, 0..64)) {
        let computed = Arc::new(AtomicUsize::new(0));
        let computed_clone = computed.clone();
        let memo = memoize(move |n: u8| {
            computed_clone.fetch_add(1, Ordering::SeqCst);
            u32::from(n) * 3
        });

        for n in &inputs {
            prop_assert_eq!(memo.call(*n), u32::from(*n) * 3);
        }

        let mut distinct = inputs.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(computed.load(Ordering::SeqCst), distinct.len());
        prop_assert_eq!(memo.len(), distinct.len());
    }

    /// Property: once replays the first result for any later arguments
    #[test]
    fn prop_once_replays_first(first in any::<i32>(), rest in prop::collection::vec(any::<i32>(), 0..20)) {
        let doubled = once(|x: i32| i64::from(x) * 2);
        let expected = i64::from(first) * 2;

        prop_assert_eq!(doubled.call(first), expected);
        for x in rest {
            prop_assert_eq!(doubled.call(x), expected);
        }
    }
}
