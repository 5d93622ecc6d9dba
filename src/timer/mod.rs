// Copyright (c) 2025 - Cowboy AI, Inc.
//! Timer Attachment and Cancellation
//!
//! Every time-based wrapper owns a [`Timers`] control block: the list of
//! pending timer handles it has scheduled plus a `canceled` flag. The
//! control block is the single leaf dependency of `lazy`, `throttle`,
//! `debounce`, `delay` and `every`.
//!
//! # Host Seam
//!
//! The actual clock is supplied by a [`Scheduler`]. The crate ships a
//! [`TokioScheduler`]; tests and embedders may provide their own.
//!
//! ```text
//! wrapper ──schedule(delay, action)──▶ Timers ──▶ Scheduler ──▶ TimerHandle
//!    │                                   │
//!    └────────────cancel()──────────────▶┘ clear() every handle, canceled = true
//! ```
//!
//! # Delay Coercion
//!
//! | Input            | Result                   |
//! |------------------|--------------------------|
//! | `+∞`             | never scheduled          |
//! | NaN, `-∞`        | 1 ms                     |
//! | negative         | 0 ms                     |
//! | beyond `Duration`| never scheduled          |

pub mod attach;
pub mod runtime;

pub use attach::Timers;
pub use runtime::TokioScheduler;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Milliseconds, fractional values allowed
pub type Millis = f64;

/// Work handed to a scheduler, run at most once
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

/// Shared scheduler reference held by every wrapper
pub type SharedScheduler = Arc<dyn Scheduler>;

/// One-shot, cancellable timer facility supplied by the host
///
/// Implementations must not run `task` synchronously from inside
/// `schedule`; callers may hold wrapper state across the call.
pub trait Scheduler: Send + Sync + 'static {
    /// Run `task` once after `delay`
    fn schedule(&self, delay: Duration, task: TimerTask) -> Box<dyn TimerHandle>;
}

/// Handle to a timer returned by a [`Scheduler`]
pub trait TimerHandle: Send + Sync {
    /// Invalidate the timer. Clearing a fired or cleared timer is a no-op.
    fn clear(&self);

    /// True once the timer has fired or been cleared
    fn is_finished(&self) -> bool;
}

/// Capability shared by every wrapper that can hold pending timers
pub trait Cancel {
    /// Invalidate all pending timers and return the wrapper
    fn cancel(&self) -> &Self;
}

/// Translate a millisecond delay into a schedulable duration
///
/// Returns `None` when the delay must never fire.
pub fn coerce_delay(ms: Millis) -> Option<Duration> {
    if ms == f64::INFINITY {
        return None;
    }
    let ms = if ms.is_finite() { ms } else { 1.0 };
    if ms <= 0.0 {
        return Some(Duration::ZERO);
    }
    Duration::try_from_secs_f64(ms / 1000.0).ok()
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
