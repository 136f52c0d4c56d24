// peek-dispatch/src/lib.rs
// ============================================================
// Task dispatch for the vision pipeline
// ------------------------------------------------------------
// Public API:
//   * Executor                – anything that runs a boxed task
//   * ScopedExecutor::submit()   – run unless shut down
//   * ScopedExecutor::shutdown() – one-way, non-blocking
//   * Inline / Looper / WorkerPool / tokio Handle executors
// ============================================================

//! peek – dispatch layer
//!
//! Result callbacks of a processing session are posted through a
//! [`ScopedExecutor`]. Once the session is stopped, [`ScopedExecutor::shutdown`]
//! turns every callback that has not started yet into a no-op: new
//! submissions are dropped on the spot and queued ones check the flag again
//! right before they run.
//!
//! The guarantee is deliberately weak: a task that is already running when
//! `shutdown` is called runs to completion, and `shutdown` does not wait for
//! it. Callers that need a drain barrier must add their own.

use log::trace;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

mod looper;
mod pool;

pub use looper::{Looper, LooperHandle};
pub use pool::WorkerPool;

/// A unit of work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Something that runs tasks, now or later, on some thread.
pub trait Executor: Send + Sync {
    fn execute(&self, task: Task);
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    fn execute(&self, task: Task) {
        (**self).execute(task)
    }
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute(&self, task: Task) {
        (**self).execute(task)
    }
}

impl Executor for tokio::runtime::Handle {
    fn execute(&self, task: Task) {
        // detached; failures surface through the runtime
        drop(self.spawn_blocking(task));
    }
}

/// Runs every task immediately on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl Executor for Inline {
    fn execute(&self, task: Task) {
        task()
    }
}

/// Executor wrapper with a one-way shutdown switch.
///
/// Clones share the same switch.
#[derive(Debug)]
pub struct ScopedExecutor<E> {
    inner: E,
    shutdown: Arc<AtomicBool>,
}

impl<E: Clone> Clone for ScopedExecutor<E> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone(), shutdown: Arc::clone(&self.shutdown) }
    }
}

impl<E: Executor> ScopedExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self { inner, shutdown: Arc::new(AtomicBool::new(false)) }
    }

    /// Hand `task` to the inner executor unless shut down. The task checks
    /// the switch again right before running. Returns `false` if the task was
    /// dropped immediately.
    pub fn submit<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_shutdown() {
            trace!("scoped executor shut down, dropping task");
            return false;
        }
        let shutdown = Arc::clone(&self.shutdown);
        self.inner.execute(Box::new(move || {
            if shutdown.load(Ordering::Acquire) {
                trace!("scoped executor shut down before task started");
                return;
            }
            task();
        }));
        true
    }

    /// Suppress all tasks that have not started yet. Irreversible.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E: Executor> Executor for ScopedExecutor<E> {
    fn execute(&self, task: Task) {
        self.submit(task);
    }
}
