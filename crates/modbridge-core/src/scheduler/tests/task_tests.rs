use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::scheduler::context::{self, ExecutionContext, RegionKey};
use crate::scheduler::error::SchedulerError;
use crate::scheduler::global::GlobalTickExecutor;
use crate::scheduler::task;

#[test]
fn test_task_runs_under_its_context() {
    let region = ExecutionContext::Region(RegionKey::new("w", 3, 4));
    let (job, handle) = task::task(region.clone(), context::current);
    job();
    assert_eq!(handle.wait(), Ok(Some(region)));
    assert_eq!(context::current(), None);
}

#[test]
fn test_cancel_before_start() {
    let executor = GlobalTickExecutor::new();
    let ran = Arc::new(AtomicBool::new(false));
    let ran_clone = Arc::clone(&ran);
    let (job, handle) = task::task(ExecutionContext::Global, move || ran_clone.store(true, Ordering::SeqCst));
    executor.submit(job);

    assert!(handle.cancel());
    assert!(!handle.cancel(), "second cancel must report no effect");
    assert_eq!(executor.tick(), 1);
    assert!(!ran.load(Ordering::SeqCst));
    assert_eq!(handle.wait(), Err(SchedulerError::Cancelled));
}

#[test]
fn test_cancel_after_completion_has_no_effect() {
    let (job, handle) = task::task(ExecutionContext::Global, || 7);
    job();
    assert!(!handle.cancel());
    assert_eq!(handle.wait(), Ok(7));
}

#[test]
fn test_panicking_work_resolves_panicked() {
    let (job, handle) = task::task::<(), _>(ExecutionContext::Global, || panic!("boom"));
    job();
    match handle.wait() {
        Err(SchedulerError::Panicked { message }) => assert_eq!(message, "boom"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_dropped_job_resolves_shut_down() {
    let (job, handle) = task::task(ExecutionContext::Global, || 1);
    drop(job);
    assert_eq!(handle.wait(), Err(SchedulerError::ShutDown));
}

#[test]
fn test_is_started_reflects_running_state() {
    let (job, handle) = task::task(ExecutionContext::Global, || ());
    assert!(!handle.is_started());
    assert!(!handle.is_finished());
    job();
    assert!(handle.is_started());
    assert!(handle.is_finished());
}

#[test]
fn test_cancelled_handle_is_finished() {
    let (_job, handle) = task::task(ExecutionContext::Global, || ());
    assert!(handle.cancel());
    assert!(handle.is_finished());
    assert!(!handle.is_started());
}

#[tokio::test]
async fn test_handle_is_awaitable() {
    let (job, handle) = task::task(ExecutionContext::Global, || "done".to_string());
    std::thread::spawn(job);
    assert_eq!(handle.await, Ok("done".to_string()));
}

#[test]
fn test_block_on_after_tick() {
    let executor = GlobalTickExecutor::new();
    let (job, handle) = task::task(ExecutionContext::Global, || 6 * 7);
    executor.submit(job);
    executor.tick();
    assert!(handle.is_finished());
    assert_eq!(futures::executor::block_on(handle), Ok(42));
}
