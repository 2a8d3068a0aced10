use std::fmt;

use crate::capability::lookup::EntryPointLookup;
use crate::kernel::constants::{DEFAULT_REGION_SHIFT, MAX_REGION_SHIFT, REGION_THREADING_MODULE};
use crate::scheduler::context::{self, BlockPos, ChunkPos, ExecutionContext};
use crate::scheduler::error::SchedulerError;
use crate::scheduler::global::GlobalTickExecutor;
use crate::scheduler::region::RegionExecutor;
use crate::scheduler::task::{self, TaskHandle};

/// Threading model of the host distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerMode {
    /// One global tick thread runs everything.
    GlobalTick,
    /// Worker threads each own a disjoint set of spatial regions.
    RegionParallel,
}

impl SchedulerMode {
    /// Region-parallel when the host exposes its region-threading marker module.
    pub fn detect(lookup: &dyn EntryPointLookup) -> Self {
        if lookup.resolve(REGION_THREADING_MODULE).is_some() {
            SchedulerMode::RegionParallel
        } else {
            SchedulerMode::GlobalTick
        }
    }
}

impl fmt::Display for SchedulerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerMode::GlobalTick => write!(f, "global-tick"),
            SchedulerMode::RegionParallel => write!(f, "region-parallel"),
        }
    }
}

enum Strategy {
    GlobalTick(GlobalTickExecutor),
    RegionParallel(RegionExecutor),
}

fn check_shift(region_shift: u32) -> Result<(), SchedulerError> {
    if region_shift > MAX_REGION_SHIFT {
        return Err(SchedulerError::InvalidRegionShift { shift: region_shift, max: MAX_REGION_SHIFT });
    }
    Ok(())
}

/// Runs work on the correct execution context for the active threading model.
///
/// This is the only component that knows which model is active. Under the
/// global-tick strategy every context collapses to [`ExecutionContext::Global`]
/// and nothing is region-checked. Under the region-parallel strategy work is
/// routed to the owning thread and region-scoped calls from any other
/// context fail with [`SchedulerError::WrongContext`].
pub struct SchedulingBridge {
    strategy: Strategy,
    region_shift: u32,
}

impl SchedulingBridge {
    /// Single-queue strategy; the host drives it with [`tick`](Self::tick).
    pub fn global_tick() -> Self {
        Self { strategy: Strategy::GlobalTick(GlobalTickExecutor::new()), region_shift: DEFAULT_REGION_SHIFT }
    }

    /// Region-routed strategy with `workers` region threads.
    ///
    /// `region_shift` may not exceed [`MAX_REGION_SHIFT`].
    pub fn region_parallel(workers: usize, region_shift: u32) -> Result<Self, SchedulerError> {
        check_shift(region_shift)?;
        Ok(Self { strategy: Strategy::RegionParallel(RegionExecutor::new(workers)?), region_shift })
    }

    pub fn new(mode: SchedulerMode, workers: usize, region_shift: u32) -> Result<Self, SchedulerError> {
        check_shift(region_shift)?;
        match mode {
            SchedulerMode::GlobalTick => Ok(Self { region_shift, ..Self::global_tick() }),
            SchedulerMode::RegionParallel => Self::region_parallel(workers, region_shift),
        }
    }

    pub fn mode(&self) -> SchedulerMode {
        match self.strategy {
            Strategy::GlobalTick(_) => SchedulerMode::GlobalTick,
            Strategy::RegionParallel(_) => SchedulerMode::RegionParallel,
        }
    }

    pub fn region_shift(&self) -> u32 {
        self.region_shift
    }

    /// Submit work for `context` and return immediately.
    ///
    /// Work for the same context runs in submission order. Nothing is
    /// ordered across contexts.
    pub fn run_at<T, F>(&self, context: ExecutionContext, work: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        match &self.strategy {
            Strategy::GlobalTick(executor) => {
                let (job, handle) = task::task(ExecutionContext::Global, work);
                executor.submit(job);
                handle
            }
            Strategy::RegionParallel(executor) => {
                let (job, handle) = task::task(context.clone(), work);
                executor.submit(&context, job);
                handle
            }
        }
    }

    /// Context the calling thread is executing in.
    pub fn current_context(&self) -> ExecutionContext {
        match &self.strategy {
            Strategy::GlobalTick(_) => ExecutionContext::Global,
            Strategy::RegionParallel(_) => context::current().unwrap_or(ExecutionContext::Global),
        }
    }

    /// Context owning the chunk that contains `pos`.
    pub fn context_for_block(&self, pos: &BlockPos) -> ExecutionContext {
        self.context_for_chunk(&pos.chunk())
    }

    pub fn context_for_chunk(&self, pos: &ChunkPos) -> ExecutionContext {
        match &self.strategy {
            Strategy::GlobalTick(_) => ExecutionContext::Global,
            Strategy::RegionParallel(_) => ExecutionContext::Region(pos.region(self.region_shift)),
        }
    }

    /// Fail unless the caller is executing in `required`.
    ///
    /// The caller is never rerouted. Under the global-tick strategy there is
    /// only one context, so this always succeeds.
    pub fn ensure_context(&self, required: &ExecutionContext) -> Result<(), SchedulerError> {
        if let Strategy::GlobalTick(_) = self.strategy {
            return Ok(());
        }
        let actual = self.current_context();
        if &actual == required {
            Ok(())
        } else {
            Err(SchedulerError::WrongContext { expected: required.clone(), actual })
        }
    }

    /// Drain the tick queue. Call once per tick from the host's tick thread.
    /// A no-op returning 0 under the region-parallel strategy.
    pub fn tick(&self) -> usize {
        match &self.strategy {
            Strategy::GlobalTick(executor) => executor.tick(),
            Strategy::RegionParallel(_) => 0,
        }
    }

    /// Tasks waiting for the next tick; always 0 under the region strategy.
    pub fn pending(&self) -> usize {
        match &self.strategy {
            Strategy::GlobalTick(executor) => executor.pending(),
            Strategy::RegionParallel(_) => 0,
        }
    }

    /// Stop accepting work. Later submissions resolve with `ShutDown`.
    pub fn shutdown(&self) {
        match &self.strategy {
            Strategy::GlobalTick(executor) => executor.shutdown(),
            Strategy::RegionParallel(executor) => executor.shutdown(),
        }
    }
}

impl fmt::Debug for SchedulingBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulingBridge")
            .field("mode", &self.mode())
            .field("region_shift", &self.region_shift)
            .finish()
    }
}
