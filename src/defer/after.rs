// Copyright (c) 2025 - Cowboy AI, Inc.
//! Counted Gate
//!
//! `After` holds back a callable until it has been called `n` times, then
//! runs it once with every gathered argument in call order and starts
//! counting again. Useful as the final callback of a fan-out whose pieces
//! finish in unknown order.

use super::{Callable, DeferFn};
use crate::timer::lock;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Wrapper that fires once every `threshold` calls
pub struct After<A, R> {
    func: DeferFn<Vec<A>, R>,
    threshold: usize,
    state: Arc<Mutex<Gathered<A>>>,
}

struct Gathered<A> {
    count: usize,
    args: Vec<A>,
}

impl<A, R> Clone for After<A, R> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            threshold: self.threshold,
            state: Arc::clone(&self.state),
        }
    }
}

impl<A: 'static, R: 'static> After<A, R> {
    /// Gate `func` behind `threshold` calls
    ///
    /// A threshold of zero runs `func` with no arguments right away and
    /// lets every later call straight through.
    pub fn new<F>(func: F, threshold: usize) -> Self
    where
        F: Fn(Vec<A>) -> R + Send + Sync + 'static,
    {
        let func: DeferFn<Vec<A>, R> = Arc::new(func);
        if threshold == 0 {
            func(Vec::new());
        }
        Self {
            func,
            threshold,
            state: Arc::new(Mutex::new(Gathered {
                count: 0,
                args: Vec::new(),
            })),
        }
    }

    /// Record a call; on the `threshold`th one, run with everything gathered
    pub fn call(&self, args: A) -> Option<R> {
        if self.threshold == 0 {
            return Some((self.func)(vec![args]));
        }

        let gathered = {
            let mut state = lock(&self.state);
            state.args.push(args);
            state.count += 1;
            if state.count < self.threshold {
                return None;
            }
            state.count = 0;
            std::mem::take(&mut state.args)
        };

        debug!(calls = gathered.len(), "counted gate released");
        Some((self.func)(gathered))
    }

    /// Calls gathered toward the next release
    pub fn count(&self) -> usize {
        lock(&self.state).count
    }
}

impl<A: 'static, R: 'static> Callable<A> for After<A, R> {
    type Output = Option<R>;

    fn invoke(&self, args: A) -> Option<R> {
        self.call(args)
    }
}
