// Copyright (c) 2025 - Cowboy AI, Inc.
//! Tokio-backed timer host

use super::{Scheduler, SharedScheduler, TimerHandle, TimerTask};
use crate::errors::DeferResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Scheduler that runs each timer as a sleeping Tokio task
///
/// A panic inside a fired task stays inside that task; it never reaches
/// the code that scheduled it.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Bind to the runtime of the calling context
    pub fn current() -> DeferResult<Self> {
        Ok(Self {
            handle: Handle::try_current()?,
        })
    }

    /// Bind to an explicit runtime handle
    pub fn from_handle(handle: Handle) -> Self {
        Self { handle }
    }

    /// Bind to the current runtime and erase the type for sharing
    pub fn shared() -> DeferResult<SharedScheduler> {
        Ok(Arc::new(Self::current()?))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> Box<dyn TimerHandle> {
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        Box::new(TokioTimer { join })
    }
}

struct TokioTimer {
    join: JoinHandle<()>,
}

impl TimerHandle for TokioTimer {
    fn clear(&self) {
        self.join.abort();
    }

    fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}
