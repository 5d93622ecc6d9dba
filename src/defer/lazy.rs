// Copyright (c) 2025 - Cowboy AI, Inc.
//! Lazy Rate-Limited Queue
//!
//! A `Lazy<A, R>` queues calls and drains them on a shared timer. Each
//! tick invokes up to `per_tick` queued calls in arrival order, which lets
//! sub-millisecond intervals be approximated with whole-millisecond timers.
//!
//! # Drain Cycle
//!
//! ```text
//! call ──▶ queue ──(unlocked?)──▶ lock ──▶ drain now (immediate)
//!                                     └──▶ drain after `rounded_ms`
//!
//! drain: queue empty? ──yes──▶ unlock, stop
//!          └──no──▶ pop min(per_tick, len) ──▶ invoke each ──▶ drain again after `rounded_ms`
//! ```
//!
//! The empty check and the unlock share one critical section, so a call
//! arriving on another thread joins the running cycle instead of starting
//! a second one.
//!
//! Calls never block. They return the result of the most recently
//! executed queued call, which may predate the call itself.

use super::{Callable, DeferFn};
use crate::timer::{lock, Cancel, Millis, SharedScheduler, Timers};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Settings for a lazy queue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyConfig {
    /// Requested gap between executions, fractions allowed
    pub interval_ms: Millis,
    /// Execute the first call of a cycle synchronously
    pub immediate: bool,
    /// Maximum queued calls while locked, `None` for unbounded
    pub limit: Option<usize>,
}

impl Default for LazyConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1.0,
            immediate: false,
            limit: None,
        }
    }
}

impl LazyConfig {
    /// Queue that waits `interval_ms` before each execution
    pub fn with_interval(interval_ms: Millis) -> Self {
        Self {
            interval_ms,
            ..Self::default()
        }
    }

    /// One call per cycle, executed at the start of the cycle
    pub fn throttle(interval_ms: Millis) -> Self {
        Self {
            interval_ms,
            immediate: true,
            limit: Some(1),
        }
    }
}

/// Timer granularity and batch size derived from a requested interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rate {
    /// Delay actually handed to the timer
    pub rounded_ms: Millis,
    /// Queued calls drained per tick, at least 1
    pub per_tick: usize,
}

impl Rate {
    /// Compute the rate for `interval_ms`; 0 and NaN mean 1 ms
    pub fn from_interval(interval_ms: Millis) -> Self {
        let interval = if interval_ms == 0.0 || interval_ms.is_nan() {
            1.0
        } else {
            interval_ms
        };
        let rounded_ms = interval.ceil();
        let ratio = (rounded_ms / interval).round();
        let per_tick = if ratio.is_finite() && ratio >= 1.0 {
            ratio as usize
        } else {
            1
        };
        Self {
            rounded_ms,
            per_tick,
        }
    }
}

/// Queue-backed wrapper that executes calls at a fixed rate
pub struct Lazy<A, R> {
    inner: Arc<LazyInner<A, R>>,
}

impl<A, R> Clone for Lazy<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct LazyInner<A, R> {
    func: DeferFn<A, R>,
    timers: Timers,
    rate: Rate,
    immediate: bool,
    limit: Option<usize>,
    state: Mutex<QueueState<A, R>>,
}

struct QueueState<A, R> {
    queue: VecDeque<A>,
    locked: bool,
    result: Option<R>,
    /// Bumped by `cancel` so a drain in progress knows to stop
    generation: u64,
}

impl<A, R> Lazy<A, R>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    /// Wrap `func` in a lazy queue driven by `scheduler`
    pub fn new<F>(scheduler: SharedScheduler, func: F, config: LazyConfig) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        let limit = config.limit.filter(|limit| *limit > 0);
        Self {
            inner: Arc::new(LazyInner {
                func: Arc::new(func),
                timers: Timers::new(scheduler),
                rate: Rate::from_interval(config.interval_ms),
                immediate: config.immediate,
                limit,
                state: Mutex::new(QueueState {
                    queue: VecDeque::new(),
                    locked: false,
                    result: None,
                    generation: 0,
                }),
            }),
        }
    }

    /// Queue a call and start a drain cycle if none is running
    ///
    /// Calls past the limit while locked are dropped. Returns the last
    /// known result of any executed call.
    pub fn call(&self, args: A) -> Option<R> {
        let inner = &self.inner;
        let generation = {
            let mut state = lock(&inner.state);
            let in_flight = usize::from(state.locked && inner.immediate);
            let has_room = inner
                .limit
                .map_or(true, |limit| state.queue.len() + in_flight < limit);
            if has_room {
                state.queue.push_back(args);
            } else {
                debug!(wrapper = %inner.timers.id(), "queue full, call dropped");
            }

            if state.locked {
                return state.result.clone();
            }
            state.locked = true;
            state.generation
        };

        if inner.immediate {
            drain(inner, generation);
        } else {
            let next = Arc::clone(inner);
            inner
                .timers
                .schedule(inner.rate.rounded_ms, move || drain(&next, generation));
        }

        lock(&inner.state).result.clone()
    }

    /// Calls waiting in the queue
    pub fn pending(&self) -> usize {
        lock(&self.inner.state).queue.len()
    }

    /// Whether a drain cycle currently holds the lock
    pub fn is_locked(&self) -> bool {
        lock(&self.inner.state).locked
    }

    /// Result of the most recently executed call
    pub fn last_result(&self) -> Option<R> {
        lock(&self.inner.state).result.clone()
    }

    /// Timer granularity and batch size in effect
    pub fn rate(&self) -> Rate {
        self.inner.rate
    }
}

/// One tick of the cycle started under `generation`
fn drain<A, R>(inner: &Arc<LazyInner<A, R>>, generation: u64)
where
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    let batch = {
        let mut state = lock(&inner.state);
        if state.generation != generation {
            return;
        }
        if state.queue.is_empty() {
            state.locked = false;
            return;
        }
        state.queue.len().min(inner.rate.per_tick)
    };

    for _ in 0..batch {
        let args = {
            let mut state = lock(&inner.state);
            if state.generation != generation {
                return;
            }
            match state.queue.pop_front() {
                Some(args) => args,
                None => break,
            }
        };
        let result = (inner.func)(args);
        lock(&inner.state).result = Some(result);
    }

    if lock(&inner.state).generation != generation {
        return;
    }
    debug!(wrapper = %inner.timers.id(), batch, "drained lazy queue");

    let next = Arc::clone(inner);
    inner
        .timers
        .schedule(inner.rate.rounded_ms, move || drain(&next, generation));
}

impl<A, R> Callable<A> for Lazy<A, R>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    type Output = Option<R>;

    fn invoke(&self, args: A) -> Option<R> {
        self.call(args)
    }
}

impl<A, R> Cancel for Lazy<A, R> {
    /// Invalidate the drain cycle and discard every queued call
    fn cancel(&self) -> &Self {
        self.inner.timers.cancel();
        let mut state = lock(&self.inner.state);
        let discarded = state.queue.len();
        state.queue.clear();
        state.locked = false;
        state.generation = state.generation.wrapping_add(1);
        debug!(wrapper = %self.inner.timers.id(), discarded, "lazy queue canceled");
        self
    }
}
