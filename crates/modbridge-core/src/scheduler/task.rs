use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::capability::entry::panic_message;
use crate::scheduler::context::{self, ExecutionContext};
use crate::scheduler::error::SchedulerError;

/// Type-erased unit of work as queued by the executors.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

type Reply<T> = Result<T, SchedulerError>;

const PENDING: u8 = 0;
const RUNNING: u8 = 1;
const CANCELLED: u8 = 2;

struct Shared<T> {
    status: AtomicU8,
    reply: Mutex<Option<oneshot::Sender<Reply<T>>>>,
}

impl<T> Shared<T> {
    fn send(&self, value: Reply<T>) {
        let sender = self.reply.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(sender) = sender {
            // Receiver may already be gone; nobody is waiting then
            let _ = sender.send(value);
        }
    }
}

/// Pending result of work submitted through the scheduling bridge.
///
/// Await it, or call [`wait`](TaskHandle::wait) from a thread that is
/// allowed to block. Dropping the handle does not cancel the work.
pub struct TaskHandle<T> {
    rx: oneshot::Receiver<Reply<T>>,
    shared: Arc<Shared<T>>,
}

impl<T> TaskHandle<T> {
    /// Cancel the task if it has not started yet.
    ///
    /// Returns true when the cancellation took effect; the handle then
    /// resolves to [`SchedulerError::Cancelled`] and the work never runs.
    /// Work that already started keeps running.
    pub fn cancel(&self) -> bool {
        let won = self
            .shared
            .status
            .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if won {
            self.shared.send(Err(SchedulerError::Cancelled));
        }
        won
    }

    pub fn is_started(&self) -> bool {
        self.shared.status.load(Ordering::Acquire) == RUNNING
    }

    /// True once the handle has a result waiting (value, error or cancellation).
    pub fn is_finished(&self) -> bool {
        self.shared.reply.lock().unwrap_or_else(PoisonError::into_inner).is_none()
    }

    /// Block the current thread until the task resolves.
    ///
    /// Must not be called from inside an async runtime, nor from the thread
    /// that is expected to run the task.
    pub fn wait(self) -> Reply<T> {
        self.rx.blocking_recv().unwrap_or(Err(SchedulerError::ShutDown))
    }
}

impl<T> Future for TaskHandle<T> {
    type Output = Reply<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(SchedulerError::ShutDown)))
    }
}

/// Resolves the handle with `ShutDown` if the job is dropped before replying.
struct ShutDownOnDrop<T>(Arc<Shared<T>>);

impl<T> Drop for ShutDownOnDrop<T> {
    fn drop(&mut self) {
        self.0.send(Err(SchedulerError::ShutDown));
    }
}

/// Wrap `work` into a job that runs under `context`, plus its handle.
///
/// A job that is dropped unrun (executor shut down) resolves the handle
/// with [`SchedulerError::ShutDown`].
pub(crate) fn task<T, F>(context: ExecutionContext, work: F) -> (Job, TaskHandle<T>)
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let shared = Arc::new(Shared { status: AtomicU8::new(PENDING), reply: Mutex::new(Some(tx)) });
    let guard = ShutDownOnDrop(Arc::clone(&shared));

    let job: Job = Box::new(move || {
        let job_shared = &guard.0;
        let started = job_shared
            .status
            .compare_exchange(PENDING, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if !started {
            return;
        }
        let _guard = context::enter(context);
        let result = panic::catch_unwind(AssertUnwindSafe(work))
            .map_err(|payload| SchedulerError::Panicked { message: panic_message(payload.as_ref()) });
        job_shared.send(result);
    });

    (job, TaskHandle { rx, shared })
}
