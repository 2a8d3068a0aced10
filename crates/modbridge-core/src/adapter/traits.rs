use crate::scheduler::{BlockPos, ChunkPos};
use crate::tag::{TagMap, TagResult, TagValue};

/// A protected region as seen through the adapter layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionHandle {
    pub id: String,
    pub world: String,
    /// Higher wins when regions overlap.
    pub priority: i64,
    pub owners: Vec<String>,
    pub members: Vec<String>,
}

impl RegionHandle {
    pub fn new(id: &str, world: &str) -> Self {
        Self { id: id.to_string(), world: world.to_string(), priority: 0, owners: Vec::new(), members: Vec::new() }
    }
}

/// A custom item definition as reported by an item module.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDescriptor {
    pub id: String,
    pub display_name: Option<String>,
    pub material: Option<String>,
    /// Module-specific item data, kept as an opaque tag tree.
    pub data: TagValue,
}

impl ItemDescriptor {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string(), display_name: None, material: None, data: TagValue::Null }
    }
}

/// Who and where a placeholder substitution is evaluated for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubstitutionContext {
    pub player: Option<String>,
    pub world: Option<String>,
    /// Extra values made available to the placeholder engine.
    pub values: TagMap,
}

impl SubstitutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_player(player: &str) -> Self {
        Self { player: Some(player.to_string()), ..Self::default() }
    }

    pub fn with_world(mut self, world: &str) -> Self {
        self.world = Some(world.to_string());
        self
    }

    pub fn with_value(mut self, key: &str, value: impl Into<TagValue>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }
}

/// Region-protection tools. Region-scoped.
///
/// Neutral behavior: no region anywhere and no restriction on building.
pub trait RegionProtection: Send + Sync {
    fn region_at(&self, pos: &BlockPos) -> Option<RegionHandle>;

    fn can_build(&self, player: &str, pos: &BlockPos) -> bool;
}

/// Placeholder / text-substitution engines.
///
/// Neutral behavior: the text comes back unchanged.
pub trait PlaceholderEngine: Send + Sync {
    fn substitute(&self, text: &str, context: &SubstitutionContext) -> String;
}

/// Custom item systems.
///
/// Neutral behavior: no item is known and no stack carries a custom id.
pub trait ItemSource: Send + Sync {
    fn query_item(&self, id: &str) -> Option<ItemDescriptor>;

    /// Custom id of the item whose serialized form is `item`.
    fn custom_id_of(&self, item: &TagValue) -> Option<String>;
}

/// Alternate world-storage backends. Region-scoped.
///
/// Neutral behavior: no chunk data, writes accepted and discarded, and no
/// world is known.
pub trait WorldStorage: Send + Sync {
    fn read_chunk(&self, pos: &ChunkPos) -> Option<TagValue>;

    /// Persist chunk data. Fails only when `data` cannot be serialized.
    fn write_chunk(&self, pos: &ChunkPos, data: &TagValue) -> TagResult<()>;

    fn world_known(&self, world: &str) -> bool;
}
