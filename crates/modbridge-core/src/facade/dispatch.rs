use crate::adapter::{ItemDescriptor, RegionHandle, SubstitutionContext};
use crate::capability::CapabilityKind;
use crate::facade::api::Facade;
use crate::facade::error::{FacadeError, FacadeResult};
use crate::scheduler::{BlockPos, ChunkPos};
use crate::tag::{self, TagValue};

/// Typed view over the argument map of a submitted operation.
struct Args<'a> {
    operation: &'a str,
    value: &'a TagValue,
}

impl<'a> Args<'a> {
    fn new(operation: &'a str, value: &'a TagValue) -> FacadeResult<Self> {
        if value.as_map().is_none() && !value.is_null() {
            return Err(FacadeError::invalid(operation, format!("arguments must be a map, got {}", value.type_name())));
        }
        Ok(Self { operation, value })
    }

    fn field(&self, key: &str) -> Option<&'a TagValue> {
        self.value.get(key).filter(|v| !v.is_null())
    }

    fn missing(&self, key: &str, expected: &str) -> FacadeError {
        FacadeError::invalid(self.operation, format!("'{}' must be {}", key, expected))
    }

    fn string(&self, key: &str) -> FacadeResult<&'a str> {
        self.field(key).and_then(TagValue::as_str).ok_or_else(|| self.missing(key, "a string"))
    }

    fn opt_string(&self, key: &str) -> FacadeResult<Option<&'a str>> {
        match self.field(key) {
            None => Ok(None),
            Some(v) => v.as_str().map(Some).ok_or_else(|| self.missing(key, "a string")),
        }
    }

    fn coord(&self, key: &str) -> FacadeResult<i32> {
        self.field(key)
            .and_then(TagValue::as_i64)
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| self.missing(key, "a 32-bit integer"))
    }

    fn any(&self, key: &str) -> FacadeResult<&'a TagValue> {
        self.field(key).ok_or_else(|| self.missing(key, "present"))
    }

    fn block(&self) -> FacadeResult<BlockPos> {
        Ok(BlockPos::new(self.string("world")?, self.coord("x")?, self.coord("y")?, self.coord("z")?))
    }

    fn chunk(&self) -> FacadeResult<ChunkPos> {
        Ok(ChunkPos::new(self.string("world")?, self.coord("x")?, self.coord("z")?))
    }

    fn substitution_context(&self) -> FacadeResult<SubstitutionContext> {
        let mut context = SubstitutionContext::new();
        context.player = self.opt_string("player")?.map(str::to_owned);
        context.world = self.opt_string("world")?.map(str::to_owned);
        match self.field("values") {
            None => {}
            Some(TagValue::Map(values)) => context.values = values.clone(),
            Some(_) => return Err(self.missing("values", "a map")),
        }
        Ok(context)
    }
}

fn region_to_tag(region: RegionHandle) -> TagValue {
    let owners = region.owners.into_iter().map(TagValue::from).collect::<Vec<_>>();
    let members = region.members.into_iter().map(TagValue::from).collect::<Vec<_>>();
    TagValue::map()
        .with("id", region.id)
        .with("world", region.world)
        .with("priority", region.priority)
        .with("owners", owners)
        .with("members", members)
}

fn item_to_tag(item: ItemDescriptor) -> TagValue {
    TagValue::map()
        .with("id", item.id)
        .with("name", item.display_name)
        .with("material", item.material)
        .with("data", item.data)
}

impl Facade {
    /// Host task submission: run `operation` of `capability` with structured arguments.
    ///
    /// Unknown capability ids answer [`TagValue::Null`], like any
    /// unavailable capability. Operation names follow the typed methods:
    ///
    /// | capability         | operation    | arguments                          | reply          |
    /// |--------------------|--------------|------------------------------------|----------------|
    /// | `regionProtection` | `regionAt`   | `world, x, y, z`                   | map or null    |
    /// | `regionProtection` | `canBuild`   | `player, world, x, y, z`           | bool           |
    /// | `placeholders`     | `substitute` | `text`, optional `player, world, values` | string   |
    /// | `customItems`      | `queryItem`  | `id`                               | map or null    |
    /// | `customItems`      | `customIdOf` | `item`                             | string or null |
    /// | `worldStorage`     | `readChunk`  | `world, x, z`                      | any or null    |
    /// | `worldStorage`     | `writeChunk` | `world, x, z, data`                | null           |
    /// | `worldStorage`     | `worldKnown` | `world`                            | bool           |
    pub fn submit(&self, capability: &str, operation: &str, args: TagValue) -> FacadeResult<TagValue> {
        let Ok(kind) = capability.parse::<CapabilityKind>() else {
            log::debug!("Submission for unrecognized capability '{}' answered with null", capability);
            return Ok(TagValue::Null);
        };
        let args = Args::new(operation, &args)?;

        match (kind, operation) {
            (CapabilityKind::RegionProtection, "regionAt") => {
                Ok(self.region_at(&args.block()?)?.map(region_to_tag).unwrap_or_default())
            }
            (CapabilityKind::RegionProtection, "canBuild") => {
                Ok(TagValue::from(self.can_build(args.string("player")?, &args.block()?)?))
            }
            (CapabilityKind::Placeholders, "substitute") => {
                Ok(TagValue::from(self.substitute(args.string("text")?, &args.substitution_context()?)?))
            }
            (CapabilityKind::CustomItems, "queryItem") => {
                Ok(self.query_item(args.string("id")?)?.map(item_to_tag).unwrap_or_default())
            }
            (CapabilityKind::CustomItems, "customIdOf") => Ok(TagValue::from(self.custom_id_of(args.any("item")?)?)),
            (CapabilityKind::WorldStorage, "readChunk") => Ok(self.read_chunk(&args.chunk()?)?.unwrap_or_default()),
            (CapabilityKind::WorldStorage, "writeChunk") => {
                self.write_chunk(&args.chunk()?, args.any("data")?)?;
                Ok(TagValue::Null)
            }
            (CapabilityKind::WorldStorage, "worldKnown") => Ok(TagValue::from(self.world_known(args.string("world")?)?)),
            _ => Err(FacadeError::UnknownOperation {
                capability: capability.to_string(),
                operation: operation.to_string(),
            }),
        }
    }

    /// [`submit`](Self::submit) over tag-encoded bytes in both directions.
    pub fn submit_encoded(&self, capability: &str, operation: &str, args: &[u8]) -> FacadeResult<Vec<u8>> {
        let args = tag::decode(args)?;
        let reply = self.submit(capability, operation, args)?;
        Ok(tag::encode(&reply)?)
    }
}
