use std::cell::RefCell;
use std::fmt;

/// Block coordinates inside a named world.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub world: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(world: &str, x: i32, y: i32, z: i32) -> Self {
        Self { world: world.to_string(), x, y, z }
    }

    /// Chunk containing this block (16x16 columns).
    pub fn chunk(&self) -> ChunkPos {
        ChunkPos::new(&self.world, self.x >> 4, self.z >> 4)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{},{},{}", self.world, self.x, self.y, self.z)
    }
}

/// Chunk coordinates inside a named world.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChunkPos {
    pub world: String,
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(world: &str, x: i32, z: i32) -> Self {
        Self { world: world.to_string(), x, z }
    }

    /// Region owning this chunk; a region spans `2^shift` chunks per side.
    pub fn region(&self, shift: u32) -> RegionKey {
        // Arithmetic shift saturates at 31 bits
        let shift = shift.min(i32::BITS - 1);
        RegionKey { world: self.world.clone(), x: self.x >> shift, z: self.z >> shift }
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@chunk({},{})", self.world, self.x, self.z)
    }
}

/// Grid coordinates of a spatial region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionKey {
    pub world: String,
    pub x: i32,
    pub z: i32,
}

impl RegionKey {
    pub fn new(world: &str, x: i32, z: i32) -> Self {
        Self { world: world.to_string(), x, z }
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@region({},{})", self.world, self.x, self.z)
    }
}

/// Where a unit of work must run.
///
/// Only the scheduling bridge creates and interprets these; everything else
/// passes them through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExecutionContext {
    Global,
    Region(RegionKey),
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionContext::Global => write!(f, "global"),
            ExecutionContext::Region(key) => write!(f, "{}", key),
        }
    }
}

thread_local! {
    static CURRENT: RefCell<Option<ExecutionContext>> = const { RefCell::new(None) };
}

/// Context of the task running on this thread, if the bridge started one.
pub(crate) fn current() -> Option<ExecutionContext> {
    CURRENT.with(|slot| slot.borrow().clone())
}

/// Marks this thread as executing in `context` until the guard drops.
pub(crate) fn enter(context: ExecutionContext) -> ContextGuard {
    let previous = CURRENT.with(|slot| slot.replace(Some(context)));
    ContextGuard { previous }
}

pub(crate) struct ContextGuard {
    previous: Option<ExecutionContext>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|slot| {
            *slot.borrow_mut() = previous;
        });
    }
}
