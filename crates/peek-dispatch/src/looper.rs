// peek-dispatch/src/looper.rs
//
// Single-thread task queue, the UI-thread style executor: any thread posts
// through a `LooperHandle`, the owning thread drains between frames.

use crate::{Executor, Task};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use log::trace;
use std::time::{Duration, Instant};

pub struct Looper {
    tx: Sender<Task>,
    rx: Receiver<Task>,
}

/// Cloneable posting side of a [`Looper`].
#[derive(Clone)]
pub struct LooperHandle {
    tx: Sender<Task>,
}

impl Default for Looper {
    fn default() -> Self {
        Self::new()
    }
}

impl Looper {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn handle(&self) -> LooperHandle {
        LooperHandle { tx: self.tx.clone() }
    }

    /// Number of queued tasks.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Run the tasks queued right now. Tasks they post in turn wait for the
    /// next call. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let queued = self.rx.len();
        let mut ran = 0;
        while ran < queued {
            match self.rx.try_recv() {
                Ok(task) => {
                    task();
                    ran += 1;
                }
                Err(_) => break,
            }
        }
        ran
    }

    /// Run tasks as they arrive until `timeout` has passed.
    pub fn run_for(&self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut ran = 0;
        loop {
            match self.rx.recv_deadline(deadline) {
                Ok(task) => {
                    task();
                    ran += 1;
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        ran
    }

    /// Wait up to `timeout` for one task and run it.
    pub fn run_one(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(task) => {
                task();
                true
            }
            Err(_) => false,
        }
    }
}

impl Executor for LooperHandle {
    fn execute(&self, task: Task) {
        if self.tx.send(task).is_err() {
            trace!("looper gone, dropping task");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn tasks_wait_for_the_owner() {
        let looper = Looper::new();
        let handle = looper.handle();
        let ran = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let ran = Arc::clone(&ran);
            handle.execute(Box::new(move || {
                ran.fetch_add(1, Ordering::SeqCst);
            }));
        }
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert_eq!(looper.pending(), 3);
        assert_eq!(looper.run_pending(), 3);
        assert_eq!(ran.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn reposted_tasks_run_next_time() {
        let looper = Looper::new();
        let handle = looper.handle();
        let again = handle.clone();
        handle.execute(Box::new(move || again.execute(Box::new(|| {}))));

        assert_eq!(looper.run_pending(), 1);
        assert_eq!(looper.pending(), 1);
        assert_eq!(looper.run_pending(), 1);
    }

    #[test]
    fn run_one_times_out_when_idle() {
        let looper = Looper::new();
        assert!(!looper.run_one(Duration::from_millis(5)));
    }
}
