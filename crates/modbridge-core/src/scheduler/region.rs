use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::scheduler::context::{ExecutionContext, RegionKey};
use crate::scheduler::error::SchedulerError;
use crate::scheduler::task::Job;

struct Routes {
    regions: Vec<UnboundedSender<Job>>,
    global: UnboundedSender<Job>,
}

/// Region-parallel executor: one OS thread per worker slot plus one
/// thread for the global region.
///
/// Each region key is owned by exactly one worker, chosen by a stable hash,
/// so all work for a region runs on one thread in submission order.
pub struct RegionExecutor {
    worker_count: usize,
    routes: Mutex<Option<Routes>>,
    threads: Mutex<Vec<JoinHandle<()>>>,
}

fn spawn_worker(name: &str, mut rx: UnboundedReceiver<Job>) -> Result<JoinHandle<()>, SchedulerError> {
    let thread_name = name.to_string();
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            while let Some(job) = rx.blocking_recv() {
                job();
            }
            log::debug!("Scheduler worker '{}' stopped", thread_name);
        })
        .map_err(|e| SchedulerError::Spawn { name: name.to_string(), message: e.to_string() })
}

impl RegionExecutor {
    /// Start `workers` region threads (at least one) and the global thread.
    pub fn new(workers: usize) -> Result<Self, SchedulerError> {
        let worker_count = workers.max(1);
        let mut threads = Vec::with_capacity(worker_count + 1);
        let mut regions = Vec::with_capacity(worker_count);

        for index in 0..worker_count {
            let (tx, rx) = mpsc::unbounded_channel();
            let name = format!("modbridge-region-{}", index);
            threads.push(spawn_worker(&name, rx)?);
            regions.push(tx);
        }

        let (global, global_rx) = mpsc::unbounded_channel();
        threads.push(spawn_worker("modbridge-global", global_rx)?);

        log::info!("Region scheduler started with {} region workers", worker_count);

        Ok(Self {
            worker_count,
            routes: Mutex::new(Some(Routes { regions, global })),
            threads: Mutex::new(threads),
        })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Index of the worker owning `key`.
    pub fn owner_of(&self, key: &RegionKey) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.worker_count as u64) as usize
    }

    /// Route a job to the thread owning `context`. After shutdown the job
    /// is dropped, resolving its handle with `ShutDown`.
    pub(crate) fn submit(&self, context: &ExecutionContext, job: Job) {
        let routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(routes) = routes.as_ref() else {
            return;
        };
        let sender = match context {
            ExecutionContext::Global => &routes.global,
            ExecutionContext::Region(key) => &routes.regions[self.owner_of(key)],
        };
        if sender.send(job).is_err() {
            log::warn!("Scheduler worker for {} is gone; task dropped", context);
        }
    }

    /// Close all queues and join the worker threads.
    ///
    /// Work already queued still runs before the workers exit. Called from a
    /// worker thread, the join of that thread is skipped.
    pub fn shutdown(&self) {
        let routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner).take();
        if routes.is_none() {
            return;
        }
        drop(routes);

        let current = thread::current().id();
        let threads = std::mem::take(&mut *self.threads.lock().unwrap_or_else(PoisonError::into_inner));
        for handle in threads {
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                log::error!("Scheduler worker panicked during shutdown");
            }
        }
        log::info!("Region scheduler shut down");
    }
}

impl Drop for RegionExecutor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
