use std::panic::{self, AssertUnwindSafe};

use crate::adapter::error::BindingError;
use crate::adapter::traits::{
    ItemDescriptor, ItemSource, PlaceholderEngine, RegionHandle, RegionProtection, SubstitutionContext, WorldStorage,
};
use crate::capability::entry::panic_message;
use crate::capability::{parse_module_version, EntryError, EntryHandle, VersionRange, DESCRIBE_OPERATION};
use crate::scheduler::{BlockPos, ChunkPos};
use crate::tag::{self, TagResult, TagValue};

/// Module versions and operations a live adapter was written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterPin {
    /// semver requirement, matched with pre-release tags ignored.
    pub supported: &'static str,
    pub operations: &'static [&'static str],
}

impl AdapterPin {
    pub fn range(&self) -> Result<VersionRange, BindingError> {
        Ok(VersionRange::from_constraint(self.supported)?)
    }
}

/// Entry handle that passed the version and `describe` checks.
#[derive(Debug, Clone)]
pub(crate) struct LiveBinding {
    entry: EntryHandle,
}

impl LiveBinding {
    pub(crate) fn bind(entry: EntryHandle, pin: &AdapterPin) -> Result<Self, BindingError> {
        let module = entry.module_id().to_string();
        let range = pin.range()?;

        let found = panic::catch_unwind(AssertUnwindSafe(|| entry.version().to_string()))
            .map_err(|payload| BindingError::Handshake {
                module: module.clone(),
                source: EntryError::Panicked {
                    module: module.clone(),
                    operation: "version".to_string(),
                    message: panic_message(payload.as_ref()),
                },
            })?;
        let in_range = parse_module_version(&found).map(|v| range.includes(&v)).unwrap_or(false);
        if !in_range {
            return Err(BindingError::VersionMismatch { module, found, supported: range.to_string() });
        }

        let offered = panic::catch_unwind(AssertUnwindSafe(|| entry.operations()))
            .unwrap_or_else(|payload| {
                Err(EntryError::Panicked {
                    module: module.clone(),
                    operation: DESCRIBE_OPERATION.to_string(),
                    message: panic_message(payload.as_ref()),
                })
            })
            .map_err(|source| BindingError::Handshake { module: module.clone(), source })?;
        if let Some(missing) = pin.operations.iter().find(|op| !offered.iter().any(|o| o.as_str() == **op)) {
            return Err(BindingError::MissingOperation { module, operation: missing.to_string() });
        }

        log::debug!("Bound live adapter to {} {}", module, found);
        Ok(Self { entry })
    }

    pub(crate) fn version(&self) -> &str {
        self.entry.version()
    }

    /// Invoke `operation`. Module errors and panics are logged and yield `None`.
    fn call(&self, operation: &str, args: &TagValue) -> Option<TagValue> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.entry.invoke(operation, args)));
        match result {
            Ok(Ok(reply)) => Some(reply),
            Ok(Err(e)) => {
                log::warn!("{}: using neutral result: {}", self.entry.module_id(), e);
                None
            }
            Err(_) => {
                log::warn!(
                    "{}: operation '{}' panicked, using neutral result",
                    self.entry.module_id(),
                    operation
                );
                None
            }
        }
    }

    fn unexpected(&self, operation: &str, expected: &str, reply: &TagValue) {
        log::warn!(
            "{}: '{}' returned {} where {} was expected, using neutral result",
            self.entry.module_id(),
            operation,
            reply.type_name(),
            expected
        );
    }

    fn call_bool(&self, operation: &str, args: &TagValue, neutral: bool) -> bool {
        match self.call(operation, args) {
            Some(TagValue::Bool(b)) => b,
            Some(other) => {
                self.unexpected(operation, "bool", &other);
                neutral
            }
            None => neutral,
        }
    }
}

fn block_args(pos: &BlockPos) -> TagValue {
    TagValue::map().with("world", pos.world.as_str()).with("x", pos.x).with("y", pos.y).with("z", pos.z)
}

fn chunk_args(pos: &ChunkPos) -> TagValue {
    TagValue::map().with("world", pos.world.as_str()).with("x", pos.x).with("z", pos.z)
}

fn string_list(value: Option<&TagValue>) -> Vec<String> {
    value
        .and_then(TagValue::as_list)
        .map(|items| items.iter().filter_map(TagValue::as_str).map(str::to_owned).collect())
        .unwrap_or_default()
}

fn optional_string(value: Option<&TagValue>) -> Option<String> {
    value.and_then(TagValue::as_str).map(str::to_owned)
}

/// Region protection backed by a WorldGuard-style module.
#[derive(Debug, Clone)]
pub struct LiveRegionProtection {
    binding: LiveBinding,
}

impl LiveRegionProtection {
    pub const PIN: AdapterPin = AdapterPin { supported: ">=7.0.0, <8.0.0", operations: &["regionAt", "canBuild"] };

    pub fn bind(entry: EntryHandle) -> Result<Self, BindingError> {
        Ok(Self { binding: LiveBinding::bind(entry, &Self::PIN)? })
    }

    pub fn version(&self) -> &str {
        self.binding.version()
    }
}

impl RegionProtection for LiveRegionProtection {
    fn region_at(&self, pos: &BlockPos) -> Option<RegionHandle> {
        let reply = self.binding.call("regionAt", &block_args(pos))?;
        if reply.is_null() {
            return None;
        }
        let Some(id) = reply.get("id").and_then(TagValue::as_str) else {
            self.binding.unexpected("regionAt", "region map with an 'id'", &reply);
            return None;
        };
        let world = reply.get("world").and_then(TagValue::as_str).unwrap_or(pos.world.as_str());
        Some(RegionHandle {
            id: id.to_string(),
            world: world.to_string(),
            priority: reply.get("priority").and_then(TagValue::as_i64).unwrap_or(0),
            owners: string_list(reply.get("owners")),
            members: string_list(reply.get("members")),
        })
    }

    fn can_build(&self, player: &str, pos: &BlockPos) -> bool {
        let args = block_args(pos).with("player", player);
        self.binding.call_bool("canBuild", &args, true)
    }
}

/// Text substitution backed by a PlaceholderAPI-style module.
#[derive(Debug, Clone)]
pub struct LivePlaceholderEngine {
    binding: LiveBinding,
}

impl LivePlaceholderEngine {
    pub const PIN: AdapterPin = AdapterPin { supported: ">=2.10.0, <3.0.0", operations: &["setPlaceholders"] };

    pub fn bind(entry: EntryHandle) -> Result<Self, BindingError> {
        Ok(Self { binding: LiveBinding::bind(entry, &Self::PIN)? })
    }

    pub fn version(&self) -> &str {
        self.binding.version()
    }
}

impl PlaceholderEngine for LivePlaceholderEngine {
    fn substitute(&self, text: &str, context: &SubstitutionContext) -> String {
        let args = TagValue::map()
            .with("text", text)
            .with("player", context.player.as_deref())
            .with("world", context.world.as_deref())
            .with("values", context.values.clone());
        match self.binding.call("setPlaceholders", &args) {
            Some(TagValue::String(s)) => s,
            Some(other) => {
                self.binding.unexpected("setPlaceholders", "string", &other);
                text.to_string()
            }
            None => text.to_string(),
        }
    }
}

/// Custom items backed by a NeigeItems-style module.
#[derive(Debug, Clone)]
pub struct LiveItemSource {
    binding: LiveBinding,
}

impl LiveItemSource {
    pub const PIN: AdapterPin = AdapterPin { supported: ">=1.14.0, <2.0.0", operations: &["getItem", "itemId"] };

    pub fn bind(entry: EntryHandle) -> Result<Self, BindingError> {
        Ok(Self { binding: LiveBinding::bind(entry, &Self::PIN)? })
    }

    pub fn version(&self) -> &str {
        self.binding.version()
    }
}

impl ItemSource for LiveItemSource {
    fn query_item(&self, id: &str) -> Option<ItemDescriptor> {
        let reply = self.binding.call("getItem", &TagValue::map().with("id", id))?;
        match &reply {
            TagValue::Null => None,
            TagValue::Map(_) => Some(ItemDescriptor {
                id: reply.get("id").and_then(TagValue::as_str).unwrap_or(id).to_string(),
                display_name: optional_string(reply.get("name")),
                material: optional_string(reply.get("material")),
                data: reply.get("data").cloned().unwrap_or_default(),
            }),
            other => {
                self.binding.unexpected("getItem", "item map", other);
                None
            }
        }
    }

    fn custom_id_of(&self, item: &TagValue) -> Option<String> {
        let reply = self.binding.call("itemId", &TagValue::map().with("item", item.clone()))?;
        match reply {
            TagValue::Null => None,
            TagValue::String(id) => Some(id),
            other => {
                self.binding.unexpected("itemId", "string", &other);
                None
            }
        }
    }
}

/// World storage backed by an AdvancedSlimePaper-style module.
#[derive(Debug, Clone)]
pub struct LiveWorldStorage {
    binding: LiveBinding,
}

impl LiveWorldStorage {
    pub const PIN: AdapterPin =
        AdapterPin { supported: ">=3.0.0, <5.0.0", operations: &["readChunk", "writeChunk", "worldExists"] };

    pub fn bind(entry: EntryHandle) -> Result<Self, BindingError> {
        Ok(Self { binding: LiveBinding::bind(entry, &Self::PIN)? })
    }

    pub fn version(&self) -> &str {
        self.binding.version()
    }
}

impl WorldStorage for LiveWorldStorage {
    fn read_chunk(&self, pos: &ChunkPos) -> Option<TagValue> {
        self.binding.call("readChunk", &chunk_args(pos)).filter(|reply| !reply.is_null())
    }

    fn write_chunk(&self, pos: &ChunkPos, data: &TagValue) -> TagResult<()> {
        // Chunk payloads must survive the tag format whatever the module does with them
        tag::encode(data)?;
        let args = chunk_args(pos).with("data", data.clone());
        if let Some(reply) = self.binding.call("writeChunk", &args) {
            if reply.as_bool() == Some(false) {
                log::warn!("{}: chunk write for {} was rejected", self.binding.entry.module_id(), pos);
            }
        }
        Ok(())
    }

    fn world_known(&self, world: &str) -> bool {
        self.binding.call_bool("worldExists", &TagValue::map().with("world", world), false)
    }
}
