// Copyright (c) 2025 - Cowboy AI, Inc.
//! Delayed and Repeating Execution
//!
//! A [`Deferred`] is the callable itself plus its timer control block.
//! `delay` and `every` hand back the same `Deferred`, so the caller keeps
//! a handle through which the scheduled work can later be canceled.
//!
//! # `every` Timing
//!
//! The next firing is armed *before* the callable runs, so a panicking
//! callable keeps its schedule and a callable may cancel itself:
//!
//! ```text
//! fire ──▶ arm next (+interval) ──▶ invoke
//! ```

use super::{Callable, DeferFn};
use crate::timer::{Cancel, Millis, SharedScheduler, Timers};
use std::sync::Arc;
use tracing::trace;

/// A callable that can be scheduled and canceled
pub struct Deferred<A, R> {
    func: DeferFn<A, R>,
    timers: Timers,
}

impl<A, R> Clone for Deferred<A, R> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            timers: self.timers.clone(),
        }
    }
}

impl<A, R> Deferred<A, R>
where
    A: Send + 'static,
    R: 'static,
{
    /// Wrap `func` with an empty timer control block
    pub fn new<F>(scheduler: SharedScheduler, func: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            timers: Timers::new(scheduler),
        }
    }

    /// Invoke right now, bypassing every timer
    pub fn call(&self, args: A) -> R {
        (self.func)(args)
    }

    /// Run once after `interval_ms` with `args`
    pub fn delay(&self, interval_ms: Millis, args: A) -> &Self {
        let func = Arc::clone(&self.func);
        self.timers.schedule(interval_ms, move || {
            func(args);
        });
        self
    }

    /// Run repeatedly, leaving `interval_ms` between firings
    pub fn every(&self, interval_ms: Millis, args: A) -> &Self
    where
        A: Clone,
    {
        let generation = self.timers.generation();
        arm_every(
            Arc::clone(&self.func),
            self.timers.clone(),
            generation,
            interval_ms,
            args,
        );
        self
    }

    /// Timers attached and not yet fired
    pub fn pending(&self) -> usize {
        self.timers.pending()
    }
}

/// Chain of firings bound to one timer generation; a `cancel` ends it
fn arm_every<A, R>(
    func: DeferFn<A, R>,
    timers: Timers,
    generation: u64,
    interval_ms: Millis,
    args: A,
) where
    A: Clone + Send + 'static,
    R: 'static,
{
    let next = timers.clone();
    timers.schedule_within(generation, interval_ms, move || {
        arm_every(
            Arc::clone(&func),
            next.clone(),
            generation,
            interval_ms,
            args.clone(),
        );
        trace!(wrapper = %next.id(), "periodic firing");
        func(args);
    });
}

impl<A, R> Callable<A> for Deferred<A, R>
where
    A: Send + 'static,
    R: 'static,
{
    type Output = R;

    fn invoke(&self, args: A) -> R {
        self.call(args)
    }
}

impl<A, R> Cancel for Deferred<A, R> {
    fn cancel(&self) -> &Self {
        self.timers.cancel();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TokioScheduler;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_delay_runs_once_with_curried_args() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let deferred = Deferred::new(TokioScheduler::shared().unwrap(), move |arg: &'static str| {
            seen_clone.lock().unwrap().push(arg);
        });

        deferred.delay(100.0, "arg1");
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(seen.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(*seen.lock().unwrap(), vec!["arg1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_is_direct() {
        let deferred = Deferred::new(TokioScheduler::shared().unwrap(), |n: u32| n + 1);
        assert_eq!(deferred.call(1), 2);
        assert_eq!(deferred.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_repeats_until_canceled() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        let deferred = Deferred::new(TokioScheduler::shared().unwrap(), move |step: usize| {
            hits_clone.fetch_add(step, Ordering::SeqCst);
        });

        deferred.every(10.0, 1);
        tokio::time::sleep(Duration::from_millis(45)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 4);

        deferred.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_can_cancel_itself() {
        let hits = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<Deferred<(), ()>>>> = Arc::new(Mutex::new(None));

        let hits_clone = hits.clone();
        let slot_clone = slot.clone();
        let deferred = Deferred::new(TokioScheduler::shared().unwrap(), move |_: ()| {
            if hits_clone.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
                if let Some(me) = slot_clone.lock().unwrap().take() {
                    me.cancel();
                }
            }
        });
        *slot.lock().unwrap() = Some(deferred.clone());

        deferred.every(10.0, ());
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(deferred.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_survives_a_panicking_call() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        let deferred = Deferred::new(TokioScheduler::shared().unwrap(), move |_: ()| {
            if hits_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("first firing fails");
            }
        });

        deferred.every(10.0, ());
        tokio::time::sleep(Duration::from_millis(35)).await;
        deferred.cancel();

        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_after_cancel_starts_a_fresh_chain() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        let deferred = Deferred::new(TokioScheduler::shared().unwrap(), move |_: ()| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        deferred.every(10.0, ());
        deferred.cancel();
        deferred.every(10.0, ());
        tokio::time::sleep(Duration::from_millis(35)).await;
        deferred.cancel();

        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(deferred.pending(), 0);
    }
}
