// Copyright (c) 2025 - Cowboy AI, Inc.
//! Argument Pre-binding
//!
//! A template of curried values where `None` marks a hole. At call time
//! holes take the call arguments in order; arguments left over after every
//! hole is filled are appended after the template.
//!
//! ```text
//! template   [ _ , 10 ]      call (5, 20)
//!              │              │
//!              └──── 5 ───────┘
//! result     [ 5 , 10 , 20 ]
//! ```

use super::{Callable, DeferFn};
use std::sync::Arc;

/// Merge call arguments into a template
///
/// Holes that no call argument reaches receive `T::default()`.
pub fn merge_args<T: Clone + Default>(template: &[Option<T>], args: Vec<T>) -> Vec<T> {
    let mut supplied = args.into_iter();
    let mut merged: Vec<T> = template
        .iter()
        .map(|slot| match slot {
            Some(value) => value.clone(),
            None => supplied.next().unwrap_or_default(),
        })
        .collect();
    merged.extend(supplied);
    merged
}

/// Wrapper that calls through with a pre-bound argument template
pub struct Filled<T, R> {
    func: DeferFn<Vec<T>, R>,
    template: Arc<[Option<T>]>,
}

impl<T, R> Clone for Filled<T, R> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            template: Arc::clone(&self.template),
        }
    }
}

impl<T, R> Filled<T, R>
where
    T: Clone + Default + 'static,
    R: 'static,
{
    /// Bind `template` in front of every call to `func`
    pub fn new<F>(func: F, template: Vec<Option<T>>) -> Self
    where
        F: Fn(Vec<T>) -> R + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            template: template.into(),
        }
    }

    /// Invoke with `args` merged into the template
    pub fn call(&self, args: Vec<T>) -> R {
        (self.func)(merge_args(&self.template, args))
    }
}

impl<T, R> Callable<Vec<T>> for Filled<T, R>
where
    T: Clone + Default + 'static,
    R: 'static,
{
    type Output = R;

    fn invoke(&self, args: Vec<T>) -> R {
        self.call(args)
    }
}
