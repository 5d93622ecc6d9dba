// Copyright (c) 2025 - Cowboy AI, Inc.
//! Wrapper Combinators
//!
//! Free functions that apply a policy to a callable and return the wrapper.
//!
//! # Available Combinators
//!
//! ## Time-based (need a scheduler)
//! - `lazy` - queue calls, drain them at a fixed (possibly fractional) rate
//! - `throttle` - at most one call per interval, run at the start of it
//! - `debounce` - run only the last call of each quiet period
//! - `delay` - run once later, returning the cancelable callable
//! - `every` - run repeatedly with a fixed idle gap
//! - `cancel` - invalidate every pending timer of a wrapper
//!
//! ## Timer-free
//! - `after` - run once every `n` calls with all gathered arguments
//! - `once` - run once, replay the first result forever
//! - `memoize` / `memoize_by` - cache results per distinct call
//! - `fill` - pre-bind arguments around holes
//!
//! # Examples
//!
//! ```rust,ignore
//! use cim_defer::defer::*;
//! use cim_defer::timer::TokioScheduler;
//!
//! let scheduler = TokioScheduler::shared()?;
//!
//! let save = throttle(&scheduler, |doc: String| persist(doc), 50.0);
//! save.call(draft.clone()); // runs now
//! save.call(draft.clone()); // dropped, inside the 50 ms window
//!
//! let heartbeat = every(&scheduler, |node: &str| ping(node), 1000.0, "core");
//! cancel(&heartbeat);
//! ```

use super::{After, Debounced, Deferred, Filled, Lazy, LazyConfig, Memoized};
use crate::timer::{Cancel, Millis, SharedScheduler};
use serde::Serialize;

/// Queue calls and execute them `interval_ms` apart
///
/// # Arguments
///
/// * `scheduler` - Timer host
/// * `func` - Callable to wrap
/// * `config` - Interval, immediate flag and queue limit
pub fn lazy<A, R, F>(scheduler: &SharedScheduler, func: F, config: LazyConfig) -> Lazy<A, R>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
    F: Fn(A) -> R + Send + Sync + 'static,
{
    Lazy::new(scheduler.clone(), func, config)
}

/// Execute at most once per `interval_ms`
///
/// Equivalent to `lazy` with `immediate = true` and `limit = 1`.
pub fn throttle<A, R, F>(scheduler: &SharedScheduler, func: F, interval_ms: Millis) -> Lazy<A, R>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
    F: Fn(A) -> R + Send + Sync + 'static,
{
    Lazy::new(scheduler.clone(), func, LazyConfig::throttle(interval_ms))
}

/// Execute the last call once `interval_ms` pass without another call
pub fn debounce<A, R, F>(scheduler: &SharedScheduler, func: F, interval_ms: Millis) -> Debounced<A>
where
    A: Send + 'static,
    F: Fn(A) -> R + Send + Sync + 'static,
{
    Debounced::new(scheduler.clone(), func, interval_ms)
}

/// Execute `func(args)` once after `interval_ms`
///
/// Returns the callable itself so the run can be canceled.
pub fn delay<A, R, F>(
    scheduler: &SharedScheduler,
    func: F,
    interval_ms: Millis,
    args: A,
) -> Deferred<A, R>
where
    A: Send + 'static,
    R: 'static,
    F: Fn(A) -> R + Send + Sync + 'static,
{
    let deferred = Deferred::new(scheduler.clone(), func);
    deferred.delay(interval_ms, args);
    deferred
}

/// Execute `func(args)` repeatedly with `interval_ms` of idle time between runs
pub fn every<A, R, F>(
    scheduler: &SharedScheduler,
    func: F,
    interval_ms: Millis,
    args: A,
) -> Deferred<A, R>
where
    A: Clone + Send + 'static,
    R: 'static,
    F: Fn(A) -> R + Send + Sync + 'static,
{
    let deferred = Deferred::new(scheduler.clone(), func);
    deferred.every(interval_ms, args);
    deferred
}

/// Invalidate all pending timers of `wrapper`
pub fn cancel<W: Cancel>(wrapper: &W) -> &W {
    wrapper.cancel()
}

/// Execute once every `n` calls with the arguments of all `n`
pub fn after<A, R, F>(func: F, n: usize) -> After<A, R>
where
    A: 'static,
    R: 'static,
    F: Fn(Vec<A>) -> R + Send + Sync + 'static,
{
    After::new(func, n)
}

/// Execute once and replay that result for every later call
pub fn once<A, R, F>(func: F) -> Memoized<A, R>
where
    A: 'static,
    R: Clone + Send + 'static,
    F: Fn(A) -> R + Send + Sync + 'static,
{
    Memoized::once(func)
}

/// Cache results keyed by the structural text of the arguments
pub fn memoize<A, R, F>(func: F) -> Memoized<A, R>
where
    A: Serialize + 'static,
    R: Clone + Send + 'static,
    F: Fn(A) -> R + Send + Sync + 'static,
{
    Memoized::new(func)
}

/// Cache results keyed by `key`
pub fn memoize_by<A, R, F, K>(func: F, key: K) -> Memoized<A, R>
where
    A: 'static,
    R: Clone + Send + 'static,
    F: Fn(A) -> R + Send + Sync + 'static,
    K: Fn(&A) -> String + Send + Sync + 'static,
{
    Memoized::with_key(func, key)
}

/// Pre-bind arguments; `None` entries are holes filled at call time
pub fn fill<T, R, F>(func: F, template: Vec<Option<T>>) -> Filled<T, R>
where
    T: Clone + Default + 'static,
    R: 'static,
    F: Fn(Vec<T>) -> R + Send + Sync + 'static,
{
    Filled::new(func, template)
}
