// Copyright (c) 2025 - Cowboy AI, Inc.
//! Per-wrapper timer control block

use super::{coerce_delay, lock, Cancel, Millis, SharedScheduler, TimerHandle};
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use tracing::trace;
use uuid::Uuid;

/// Pending timers and cancellation flag owned by one wrapper
///
/// Cloning yields another handle to the same control block.
#[derive(Clone)]
pub struct Timers {
    id: Uuid,
    scheduler: SharedScheduler,
    state: Arc<Mutex<TimerState>>,
}

#[derive(Default)]
struct TimerState {
    handles: Vec<Box<dyn TimerHandle>>,
    canceled: bool,
    /// Bumped whenever every pending timer is invalidated
    generation: u64,
}

impl TimerState {
    fn clear(&mut self) -> usize {
        let cleared = self.handles.len();
        for handle in self.handles.drain(..) {
            handle.clear();
        }
        self.generation = self.generation.wrapping_add(1);
        cleared
    }
}

impl Debug for Timers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("Timers")
            .field("id", &self.id)
            .field("pending", &state.handles.len())
            .field("canceled", &state.canceled)
            .field("generation", &state.generation)
            .finish()
    }
}

impl Timers {
    /// Create an empty control block on top of `scheduler`
    pub fn new(scheduler: SharedScheduler) -> Self {
        Self {
            id: Uuid::now_v7(),
            scheduler,
            state: Arc::new(Mutex::new(TimerState::default())),
        }
    }

    /// Identifier used to correlate log lines of one wrapper
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Token that changes on every `cancel` and `replace`
    pub fn generation(&self) -> u64 {
        lock(&self.state).generation
    }

    /// Run `action` once after `delay_ms`
    ///
    /// Clears the `canceled` flag. When the timer fires the action runs
    /// only if no `cancel` happened since. Returns `false` when the delay
    /// coerces to "never" and nothing was scheduled.
    pub fn schedule<F>(&self, delay_ms: Millis, action: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = lock(&self.state);
        self.attach(&mut state, delay_ms, action)
    }

    /// Attach `action` only while the generation is still `generation`
    ///
    /// The check and the attach share one lock, so a `cancel` racing this
    /// call either wins and nothing is attached, or loses and clears the
    /// new timer.
    pub fn schedule_within<F>(&self, generation: u64, delay_ms: Millis, action: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = lock(&self.state);
        if state.generation != generation {
            trace!(wrapper = %self.id, generation, "stale generation, not scheduled");
            return false;
        }
        self.attach(&mut state, delay_ms, action)
    }

    /// Invalidate every pending timer and attach `action` in its place
    ///
    /// Of two racing replacements only the later one fires.
    pub fn replace<F>(&self, delay_ms: Millis, action: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = lock(&self.state);
        let cleared = state.clear();
        trace!(wrapper = %self.id, cleared, "timers replaced");
        self.attach(&mut state, delay_ms, action)
    }

    fn attach<F>(&self, state: &mut TimerState, delay_ms: Millis, action: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let Some(delay) = coerce_delay(delay_ms) else {
            trace!(wrapper = %self.id, delay_ms, "delay never elapses, not scheduled");
            return false;
        };

        state.canceled = false;
        state.handles.retain(|handle| !handle.is_finished());

        let generation = state.generation;
        let guard = Arc::clone(&self.state);
        let id = self.id;
        let handle = self.scheduler.schedule(
            delay,
            Box::new(move || {
                if lock(&guard).generation != generation {
                    trace!(wrapper = %id, "timer fired after cancel, skipped");
                    return;
                }
                trace!(wrapper = %id, "timer fired");
                action();
            }),
        );

        state.handles.push(handle);
        trace!(wrapper = %self.id, ?delay, "timer attached");
        true
    }

    /// Number of attached handles that have not fired yet
    pub fn pending(&self) -> usize {
        lock(&self.state)
            .handles
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Whether `cancel` ran after the most recent `schedule`
    pub fn is_canceled(&self) -> bool {
        lock(&self.state).canceled
    }
}

impl Cancel for Timers {
    fn cancel(&self) -> &Self {
        let mut state = lock(&self.state);
        let cleared = state.clear();
        state.canceled = true;
        trace!(wrapper = %self.id, cleared, "timers canceled");
        self
    }
}
