// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deferred Execution Demo
//!
//! Fires a burst of calls through a lazy queue, a throttle and a debounce,
//! then waits for every wrapper to settle and reports how many calls each
//! one let through.
//!
//! Run with: cargo run --bin defer-demo
//!
//! Environment:
//! - `DEFER_INTERVAL_MS` - wrapper interval, fractions allowed (default 20)
//! - `DEFER_LIMIT` - lazy queue limit, 0 for unbounded (default 0)
//! - `DEFER_IMMEDIATE` - run the first queued call synchronously (default false)
//! - `DEFER_CALLS` - size of the burst (default 10)

use anyhow::{Context, Result};
use cim_defer::defer::{debounce, lazy, throttle};
use cim_defer::{Cancel, LazyConfig, TokioScheduler};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Configuration for the demo run
#[derive(Debug, Clone)]
struct DemoConfig {
    /// Settings of the lazy queue
    lazy: LazyConfig,
    /// Calls made in the burst
    calls: usize,
}

impl DemoConfig {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let interval_ms = env_or("DEFER_INTERVAL_MS", 20.0)?;
        let limit = env_or("DEFER_LIMIT", 0usize)?;
        let immediate = env_or("DEFER_IMMEDIATE", false)?;
        let calls = env_or("DEFER_CALLS", 10usize)?;

        Ok(Self {
            lazy: LazyConfig {
                interval_ms,
                immediate,
                limit: Some(limit),
            },
            calls,
        })
    }
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

fn counter(label: &'static str) -> (Arc<AtomicUsize>, impl Fn(usize) -> usize + Send + Sync) {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();
    let func = move |n: usize| {
        let total = hits_clone.fetch_add(1, Ordering::SeqCst) + 1;
        info!(wrapper = label, call = n, total, "executed");
        total
    };
    (hits, func)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = DemoConfig::from_env()?;
    info!(?config, "configuration loaded");

    let scheduler = TokioScheduler::shared().context("Failed to bind timer runtime")?;
    let interval_ms = config.lazy.interval_ms;

    let (lazy_hits, lazy_fn) = counter("lazy");
    let (throttle_hits, throttle_fn) = counter("throttle");
    let (debounce_hits, debounce_fn) = counter("debounce");

    let queued = lazy(&scheduler, lazy_fn, config.lazy);
    let throttled = throttle(&scheduler, throttle_fn, interval_ms);
    let debounced = debounce(&scheduler, debounce_fn, interval_ms);

    for n in 0..config.calls {
        queued.call(n);
        throttled.call(n);
        debounced.call(n);
    }
    info!(pending = queued.pending(), rate = ?queued.rate(), "burst queued");

    let per_tick = queued.rate().per_tick.max(1);
    let ticks = config.calls.div_ceil(per_tick) as f64 + 2.0;
    let settle = Duration::try_from_secs_f64(queued.rate().rounded_ms * ticks / 1000.0)
        .unwrap_or(Duration::from_secs(1));
    tokio::time::sleep(settle).await;

    queued.cancel();
    throttled.cancel();
    debounced.cancel();

    info!(
        lazy = lazy_hits.load(Ordering::SeqCst),
        throttle = throttle_hits.load(Ordering::SeqCst),
        debounce = debounce_hits.load(Ordering::SeqCst),
        "settled"
    );
    Ok(())
}
