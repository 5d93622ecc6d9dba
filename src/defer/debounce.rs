// Copyright (c) 2025 - Cowboy AI, Inc.
//! Trailing-edge debounce

use super::{Callable, DeferFn};
use crate::timer::{Cancel, Millis, SharedScheduler, Timers};
use std::sync::Arc;

/// Wrapper that runs only the last call of each quiet period
///
/// Every call cancels the pending execution and schedules a fresh one
/// `interval_ms` later with the newest arguments.
pub struct Debounced<A> {
    func: DeferFn<A, ()>,
    timers: Timers,
    interval_ms: Millis,
}

impl<A> Clone for Debounced<A> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            timers: self.timers.clone(),
            interval_ms: self.interval_ms,
        }
    }
}

impl<A: Send + 'static> Debounced<A> {
    /// Wrap `func`; its return value is discarded
    pub fn new<F, R>(scheduler: SharedScheduler, func: F, interval_ms: Millis) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(move |args: A| {
                func(args);
            }),
            timers: Timers::new(scheduler),
            interval_ms,
        }
    }

    /// Restart the quiet period with these arguments
    ///
    /// The pending execution is swapped out under one lock, so concurrent
    /// callers still produce a single execution per quiet period.
    pub fn call(&self, args: A) {
        let func = Arc::clone(&self.func);
        self.timers.replace(self.interval_ms, move || func(args));
    }

    /// Whether an execution is waiting for the quiet period to end
    pub fn is_pending(&self) -> bool {
        self.timers.pending() > 0
    }
}

impl<A: Send + 'static> Callable<A> for Debounced<A> {
    type Output = ();

    fn invoke(&self, args: A) {
        self.call(args);
    }
}

impl<A> Cancel for Debounced<A> {
    fn cancel(&self) -> &Self {
        self.timers.cancel();
        self
    }
}
