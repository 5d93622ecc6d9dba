// Copyright (c) 2025 - Cowboy AI, Inc.
//! Memoization Cache
//!
//! A [`Memoized`] wrapper caches results by a string key computed from the
//! call arguments. A key present in the cache is a hit regardless of the
//! stored value, so `None`, `0` or an empty string are replayed like any
//! other result.
//!
//! The default key is the `serde_json` text of the whole argument value.
//! Structurally equal arguments produce the same key even when they are
//! distinct values:
//!
//! ```rust,ignore
//! let lookup = memoize(|tags: Vec<String>| expensive(tags));
//! lookup.call(vec!["a".into()]);
//! lookup.call(vec!["a".into()]); // cache hit
//! ```
//!
//! `once` is memoization under a constant key: the first result is
//! replayed forever, whatever the later arguments are.

use super::{Callable, DeferFn};
use crate::errors::DeferResult;
use crate::timer::lock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Computes the cache key of one call
pub type KeyFn<A> = Arc<dyn Fn(&A) -> DeferResult<String> + Send + Sync>;

/// Default cache key: structural JSON text of the arguments
pub fn stringify_args<A: Serialize>(args: &A) -> DeferResult<String> {
    Ok(serde_json::to_string(args)?)
}

/// Wrapper that computes each distinct call once
pub struct Memoized<A, R> {
    func: DeferFn<A, R>,
    key: KeyFn<A>,
    cache: Arc<Mutex<HashMap<String, R>>>,
}

impl<A, R> Clone for Memoized<A, R> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            key: Arc::clone(&self.key),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<A, R> Memoized<A, R>
where
    A: 'static,
    R: Clone + Send + 'static,
{
    /// Cache by the structural text of the arguments
    pub fn new<F>(func: F) -> Self
    where
        A: Serialize,
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self::with_key_fn(func, Arc::new(|args: &A| stringify_args(args)))
    }

    /// Cache by a caller-supplied key
    pub fn with_key<F, K>(func: F, key: K) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
        K: Fn(&A) -> String + Send + Sync + 'static,
    {
        Self::with_key_fn(func, Arc::new(move |args: &A| Ok(key(args))))
    }

    /// Cache every call under one slot
    pub fn once<F>(func: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self::with_key(func, |_| String::new())
    }

    fn with_key_fn<F>(func: F, key: KeyFn<A>) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            key,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Return the cached result for these arguments, computing it on a miss
    ///
    /// The cache is not locked while the wrapped function runs, so a
    /// recursive function may call its own wrapper. When concurrent misses
    /// race, the first stored result is kept and handed to every caller.
    pub fn call(&self, args: A) -> R {
        let key = match (self.key)(&args) {
            Ok(key) => key,
            Err(err) => {
                warn!(error = %err, "cache key unavailable, calling uncached");
                return (self.func)(args);
            }
        };

        if let Some(hit) = lock(&self.cache).get(&key) {
            return hit.clone();
        }

        let result = (self.func)(args);
        lock(&self.cache).entry(key).or_insert(result).clone()
    }

    /// Number of distinct keys cached
    pub fn len(&self) -> usize {
        lock(&self.cache).len()
    }

    /// Whether nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A, R> Callable<A> for Memoized<A, R>
where
    A: 'static,
    R: Clone + Send + 'static,
{
    type Output = R;

    fn invoke(&self, args: A) -> R {
        self.call(args)
    }
}
