// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deferred-Execution Wrappers
//!
//! Each wrapper takes a callable and changes *when* or *how often* it
//! runs, never what it computes. A wrapper is a cheap `Clone` handle over
//! its own private state; two wrappers around the same function share
//! nothing.
//!
//! # Wrapper Families
//!
//! ## Time-based (own a [`Timers`](crate::timer::Timers) control block)
//!
//! - [`Lazy`] - FIFO queue drained at a fixed rate (`lazy`, `throttle`)
//! - [`Debounced`] - trailing-edge execution after a quiet period
//! - [`Deferred`] - the callable itself, scheduled with `delay` / `every`
//!
//! ## Timer-free
//!
//! - [`Memoized`] - result cache keyed by call signature (`memoize`, `once`)
//! - [`After`] - fires once every `n` calls with all gathered arguments
//! - [`Filled`] - argument template with holes
//!
//! # Arguments
//!
//! Wrapped callables take a single argument value `A`. Several arguments
//! travel as a tuple:
//!
//! ```rust,ignore
//! use cim_defer::defer::memoize;
//!
//! let area = memoize(|(w, h): (u32, u32)| w * h);
//! assert_eq!(area.call((3, 4)), 12);
//! ```

pub mod after;
pub mod combinators;
pub mod debounce;
pub mod deferred;
pub mod fill;
pub mod lazy;
pub mod memoize;

pub use after::After;
pub use combinators::*;
pub use debounce::Debounced;
pub use deferred::Deferred;
pub use fill::{merge_args, Filled};
pub use lazy::{Lazy, LazyConfig, Rate};
pub use memoize::{stringify_args, Memoized};

use std::sync::Arc;

/// Shared, type-erased callable stored inside wrappers
pub type DeferFn<A, R> = Arc<dyn Fn(A) -> R + Send + Sync>;

/// Invoke capability shared by every wrapper
///
/// Lets code drive any wrapper without knowing which policy it applies.
pub trait Callable<A> {
    /// What a single invocation hands back to the caller
    type Output;

    /// Hand `args` to the wrapper under its policy
    fn invoke(&self, args: A) -> Self::Output;
}
