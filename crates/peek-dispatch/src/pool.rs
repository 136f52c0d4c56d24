// peek-dispatch/src/pool.rs
//
// Fixed set of worker threads fed by one channel. Used for the detection
// stage, which must stay off the render thread.

use crate::{Executor, Task};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, warn};
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

pub struct WorkerPool {
    tx: Option<Sender<Task>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `threads` workers (at least one).
    pub fn new(threads: usize) -> io::Result<Self> {
        let threads = threads.max(1);
        let (tx, rx) = unbounded::<Task>();

        let mut workers = Vec::with_capacity(threads);
        for i in 0..threads {
            let rx = rx.clone();
            let handle = thread::Builder::new()
                .name(format!("peek-worker-{i}"))
                .spawn(move || worker_loop(rx))?;
            workers.push(handle);
        }
        debug!("worker pool started with {} threads", threads);

        Ok(Self { tx: Some(tx), workers })
    }

    /// One worker per core, leaving one core for the render thread.
    pub fn with_default_threads() -> io::Result<Self> {
        Self::new(num_cpus::get().saturating_sub(1))
    }

    pub fn threads(&self) -> usize {
        self.workers.len()
    }
}

fn worker_loop(rx: Receiver<Task>) {
    while let Ok(task) = rx.recv() {
        if catch_unwind(AssertUnwindSafe(task)).is_err() {
            error!("worker task panicked");
        }
    }
}

impl Executor for WorkerPool {
    fn execute(&self, task: Task) {
        match &self.tx {
            Some(tx) if tx.send(task).is_ok() => {}
            _ => warn!("worker pool stopped, dropping task"),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // closing the channel lets every worker finish its queue and exit
        drop(self.tx.take());
        for worker in self.workers.drain(..) {
            let _ = worker.join();
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
    fn drop_drains_the_queue() {
        let ran = Arc::new(AtomicUsize::new(0));
        {
            let pool = WorkerPool::new(3).unwrap();
            assert_eq!(pool.threads(), 3);
            for _ in 0..100 {
                let ran = Arc::clone(&ran);
                pool.execute(Box::new(move || {
                    ran.fetch_add(1, Ordering::SeqCst);
                }));
            }
        }
        assert_eq!(ran.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn panicking_task_does_not_kill_worker() {
        let ran = Arc::new(AtomicUsize::new(0));
        {
            let pool = WorkerPool::new(1).unwrap();
            pool.execute(Box::new(|| panic!("boom")));
            let r = Arc::clone(&ran);
            pool.execute(Box::new(move || {
                r.fetch_add(1, Ordering::SeqCst);
            }));
        }
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn zero_threads_rounds_up() {
        assert_eq!(WorkerPool::new(0).unwrap().threads(), 1);
    }
}
