use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::scheduler::task::Job;

/// Single logical queue drained by the host's tick thread.
///
/// Work submitted before a tick starts runs during that tick, in
/// submission order. Work submitted while a tick is running waits for the
/// next one, so a task that resubmits itself cannot starve the tick.
#[derive(Default)]
pub struct GlobalTickExecutor {
    queue: Mutex<VecDeque<Job>>,
    shut_down: AtomicBool,
    ticks: AtomicU64,
}

impl GlobalTickExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a job. Jobs offered after shutdown are dropped, which resolves
    /// their handles with `ShutDown`.
    pub(crate) fn submit(&self, job: Job) {
        if self.shut_down.load(Ordering::Acquire) {
            drop(job);
            return;
        }
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).push_back(job);
    }

    /// Run everything queued before this call. Returns the number of jobs run.
    pub fn tick(&self) -> usize {
        let batch = std::mem::take(&mut *self.queue.lock().unwrap_or_else(PoisonError::into_inner));
        let count = batch.len();
        for job in batch {
            job();
        }
        self.ticks.fetch_add(1, Ordering::Relaxed);
        count
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Stop accepting work and drop whatever is still queued.
    pub fn shutdown(&self) {
        self.shut_down.store(true, Ordering::Release);
        let dropped = std::mem::take(&mut *self.queue.lock().unwrap_or_else(PoisonError::into_inner));
        if !dropped.is_empty() {
            log::debug!("Dropping {} queued tick tasks on shutdown", dropped.len());
        }
    }
}
