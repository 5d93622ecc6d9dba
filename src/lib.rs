//! Deferred-execution control for the Composable Information Machine
//!
//! This crate wraps arbitrary callables and changes when and how often they
//! run: rate-limited queues, throttling, debouncing, delayed and periodic
//! execution, counted gates, memoization and argument pre-binding.

pub mod defer;
pub mod errors;
pub mod timer;

// Re-export commonly used types
pub use defer::{After, Callable, Debounced, Deferred, Filled, Lazy, LazyConfig, Memoized, Rate};
pub use errors::{DeferError, DeferResult};
pub use timer::{Cancel, Millis, Scheduler, SharedScheduler, TimerHandle, Timers, TokioScheduler};
