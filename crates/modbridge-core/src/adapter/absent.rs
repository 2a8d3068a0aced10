use crate::adapter::traits::{
    ItemDescriptor, ItemSource, PlaceholderEngine, RegionHandle, RegionProtection, SubstitutionContext, WorldStorage,
};
use crate::scheduler::{BlockPos, ChunkPos};
use crate::tag::{TagResult, TagValue};

/// Stand-in bound when a capability's module is missing or could not be bound.
///
/// Every operation returns the neutral result of its trait and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsentAdapter;

impl RegionProtection for AbsentAdapter {
    fn region_at(&self, _pos: &BlockPos) -> Option<RegionHandle> {
        None
    }

    fn can_build(&self, _player: &str, _pos: &BlockPos) -> bool {
        true
    }
}

impl PlaceholderEngine for AbsentAdapter {
    fn substitute(&self, text: &str, _context: &SubstitutionContext) -> String {
        text.to_string()
    }
}

impl ItemSource for AbsentAdapter {
    fn query_item(&self, _id: &str) -> Option<ItemDescriptor> {
        None
    }

    fn custom_id_of(&self, _item: &TagValue) -> Option<String> {
        None
    }
}

impl WorldStorage for AbsentAdapter {
    fn read_chunk(&self, _pos: &ChunkPos) -> Option<TagValue> {
        None
    }

    fn write_chunk(&self, _pos: &ChunkPos, _data: &TagValue) -> TagResult<()> {
        Ok(())
    }

    fn world_known(&self, _world: &str) -> bool {
        false
    }
}
