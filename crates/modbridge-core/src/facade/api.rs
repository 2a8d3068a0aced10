use std::collections::BTreeMap;
use std::sync::Arc;

use crate::adapter::{AdapterRegistry, BindingState, ItemDescriptor, RegionHandle, SubstitutionContext};
use crate::capability::CapabilityKind;
use crate::facade::error::{FacadeError, FacadeResult};
use crate::scheduler::{BlockPos, ChunkPos, ExecutionContext, SchedulingBridge, TaskHandle};
use crate::tag::TagValue;

/// The one surface the host calls into.
///
/// Validates inputs, checks the execution context for region-scoped
/// capabilities, then delegates to whichever adapter the registry bound.
/// Holds nothing but shared references, so it is cheap to clone.
#[derive(Debug, Clone)]
pub struct Facade {
    registry: Arc<AdapterRegistry>,
    bridge: Arc<SchedulingBridge>,
}

fn require_name(operation: &str, what: &str, value: &str) -> FacadeResult<()> {
    if value.trim().is_empty() {
        return Err(FacadeError::invalid(operation, format!("{} must not be empty", what)));
    }
    Ok(())
}

impl Facade {
    pub fn new(registry: Arc<AdapterRegistry>, bridge: Arc<SchedulingBridge>) -> Self {
        Self { registry, bridge }
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    pub fn bridge(&self) -> &SchedulingBridge {
        &self.bridge
    }

    /// Binding state of every recognized capability.
    pub fn capabilities(&self) -> BTreeMap<CapabilityKind, BindingState> {
        self.registry.states().map(|(kind, state)| (kind, state.clone())).collect()
    }

    pub fn is_live(&self, kind: CapabilityKind) -> bool {
        self.registry.state(kind).is_live()
    }

    /// Run `work` on the context owning `pos`, where region-scoped calls for
    /// that position are allowed.
    pub fn run_at_block<T, F>(&self, pos: &BlockPos, work: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        self.bridge.run_at(self.bridge.context_for_block(pos), work)
    }

    pub fn run_at_chunk<T, F>(&self, pos: &ChunkPos, work: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        self.bridge.run_at(self.bridge.context_for_chunk(pos), work)
    }

    fn on_owning_context(&self, operation: &str, world: &str, context: ExecutionContext) -> FacadeResult<()> {
        require_name(operation, "world name", world)?;
        self.bridge.ensure_context(&context)?;
        Ok(())
    }

    /// Protected region at `pos`, if any. Must run on the context owning `pos`.
    pub fn region_at(&self, pos: &BlockPos) -> FacadeResult<Option<RegionHandle>> {
        self.on_owning_context("regionAt", &pos.world, self.bridge.context_for_block(pos))?;
        Ok(self.registry.region_protection().region_at(pos))
    }

    /// Whether `player` may build at `pos`; `true` when no protection module is bound.
    pub fn can_build(&self, player: &str, pos: &BlockPos) -> FacadeResult<bool> {
        require_name("canBuild", "player", player)?;
        self.on_owning_context("canBuild", &pos.world, self.bridge.context_for_block(pos))?;
        Ok(self.registry.region_protection().can_build(player, pos))
    }

    /// Expand placeholders in `text`; unchanged text when no engine is bound.
    pub fn substitute(&self, text: &str, context: &SubstitutionContext) -> FacadeResult<String> {
        if let Some(player) = &context.player {
            require_name("substitute", "player", player)?;
        }
        if let Some(world) = &context.world {
            require_name("substitute", "world name", world)?;
        }
        Ok(self.registry.placeholders().substitute(text, context))
    }

    pub fn query_item(&self, id: &str) -> FacadeResult<Option<ItemDescriptor>> {
        require_name("queryItem", "item id", id)?;
        Ok(self.registry.custom_items().query_item(id))
    }

    /// Custom id of a serialized item stack, which must be a tag map.
    pub fn custom_id_of(&self, item: &TagValue) -> FacadeResult<Option<String>> {
        if item.as_map().is_none() {
            return Err(FacadeError::invalid("customIdOf", format!("item must be a map, got {}", item.type_name())));
        }
        Ok(self.registry.custom_items().custom_id_of(item))
    }

    pub fn read_chunk(&self, pos: &ChunkPos) -> FacadeResult<Option<TagValue>> {
        self.on_owning_context("readChunk", &pos.world, self.bridge.context_for_chunk(pos))?;
        Ok(self.registry.world_storage().read_chunk(pos))
    }

    pub fn write_chunk(&self, pos: &ChunkPos, data: &TagValue) -> FacadeResult<()> {
        self.on_owning_context("writeChunk", &pos.world, self.bridge.context_for_chunk(pos))?;
        Ok(self.registry.world_storage().write_chunk(pos, data)?)
    }

    /// Whether the storage backend manages `world`. World-level, so callable
    /// from any context.
    pub fn world_known(&self, world: &str) -> FacadeResult<bool> {
        require_name("worldKnown", "world name", world)?;
        Ok(self.registry.world_storage().world_known(world))
    }
}
