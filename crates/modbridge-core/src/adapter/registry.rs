use std::collections::BTreeMap;
use std::fmt;

use crate::adapter::absent::AbsentAdapter;
use crate::adapter::error::BindingError;
use crate::adapter::live::{LiveItemSource, LivePlaceholderEngine, LiveRegionProtection, LiveWorldStorage};
use crate::adapter::traits::{ItemSource, PlaceholderEngine, RegionProtection, WorldStorage};
use crate::capability::{CapabilityKind, CapabilitySet, EntryHandle};

/// How a capability ended up bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingState {
    /// Live adapter talking to the module.
    Live { module: String, version: String },
    /// Module was not available; the absent adapter is bound.
    Absent,
    /// Module was present but binding failed; the absent adapter is bound.
    Degraded { module: String, reason: String },
}

impl BindingState {
    pub fn is_live(&self) -> bool {
        matches!(self, BindingState::Live { .. })
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, BindingState::Degraded { .. })
    }
}

impl fmt::Display for BindingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingState::Live { module, version } => write!(f, "live ({} {})", module, version),
            BindingState::Absent => write!(f, "absent"),
            BindingState::Degraded { module, reason } => write!(f, "degraded ({}): {}", module, reason),
        }
    }
}

/// Record of a present module that could not be bound.
#[derive(Debug, Clone, PartialEq)]
pub struct DegradedWarning {
    pub capability: CapabilityKind,
    pub module: String,
    pub error: BindingError,
}

impl fmt::Display for DegradedWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} running without {}: {}", self.capability, self.module, self.error)
    }
}

/// Borrowed adapter for one capability.
#[derive(Clone, Copy)]
pub enum AdapterRef<'a> {
    RegionProtection(&'a dyn RegionProtection),
    Placeholders(&'a dyn PlaceholderEngine),
    CustomItems(&'a dyn ItemSource),
    WorldStorage(&'a dyn WorldStorage),
}

impl<'a> AdapterRef<'a> {
    pub fn kind(&self) -> CapabilityKind {
        match self {
            AdapterRef::RegionProtection(_) => CapabilityKind::RegionProtection,
            AdapterRef::Placeholders(_) => CapabilityKind::Placeholders,
            AdapterRef::CustomItems(_) => CapabilityKind::CustomItems,
            AdapterRef::WorldStorage(_) => CapabilityKind::WorldStorage,
        }
    }

    pub fn as_region_protection(&self) -> Option<&'a dyn RegionProtection> {
        match *self {
            AdapterRef::RegionProtection(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_placeholders(&self) -> Option<&'a dyn PlaceholderEngine> {
        match *self {
            AdapterRef::Placeholders(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_custom_items(&self) -> Option<&'a dyn ItemSource> {
        match *self {
            AdapterRef::CustomItems(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_world_storage(&self) -> Option<&'a dyn WorldStorage> {
        match *self {
            AdapterRef::WorldStorage(a) => Some(a),
            _ => None,
        }
    }
}

impl fmt::Debug for AdapterRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AdapterRef").field(&self.kind()).finish()
    }
}

/// One adapter per recognized capability, bound once at startup.
///
/// Bindings never change after [`build`](AdapterRegistry::build); a module
/// that appears or disappears later needs a restart.
pub struct AdapterRegistry {
    region_protection: Box<dyn RegionProtection>,
    placeholders: Box<dyn PlaceholderEngine>,
    custom_items: Box<dyn ItemSource>,
    world_storage: Box<dyn WorldStorage>,
    states: BTreeMap<CapabilityKind, BindingState>,
    warnings: Vec<DegradedWarning>,
}

struct Binder<'a> {
    capabilities: &'a CapabilitySet,
    states: BTreeMap<CapabilityKind, BindingState>,
    warnings: Vec<DegradedWarning>,
}

impl Binder<'_> {
    /// Bind `kind` live when it is available, otherwise fall back to `absent`.
    fn bind<A, L>(
        &mut self,
        kind: CapabilityKind,
        live: impl FnOnce(EntryHandle) -> Result<(Box<A>, String), BindingError>,
        absent: L,
    ) -> Box<A>
    where
        A: ?Sized,
        L: FnOnce() -> Box<A>,
    {
        let Some(entry) = self.capabilities.entry(kind.id()).cloned() else {
            log::info!("{}: module not available, using absent adapter", kind);
            self.states.insert(kind, BindingState::Absent);
            return absent();
        };

        let module = entry.module_id().to_string();
        match live(entry) {
            Ok((adapter, version)) => {
                log::info!("{}: bound to {} {}", kind, module, version);
                self.states.insert(kind, BindingState::Live { module, version });
                adapter
            }
            Err(error) => {
                log::warn!("{}: degraded, {} could not be bound: {}", kind, module, error);
                self.states.insert(kind, BindingState::Degraded { module: module.clone(), reason: error.to_string() });
                self.warnings.push(DegradedWarning { capability: kind, module, error });
                absent()
            }
        }
    }
}

impl AdapterRegistry {
    /// Bind every recognized capability. Never fails: anything that cannot
    /// be bound live gets the absent adapter.
    pub fn build(capabilities: &CapabilitySet) -> Self {
        let mut binder = Binder { capabilities, states: BTreeMap::new(), warnings: Vec::new() };

        let region_protection = binder.bind(
            CapabilityKind::RegionProtection,
            |entry| {
                let adapter = LiveRegionProtection::bind(entry)?;
                let version = adapter.version().to_string();
                Ok((Box::new(adapter) as Box<dyn RegionProtection>, version))
            },
            || Box::new(AbsentAdapter) as Box<dyn RegionProtection>,
        );
        let placeholders = binder.bind(
            CapabilityKind::Placeholders,
            |entry| {
                let adapter = LivePlaceholderEngine::bind(entry)?;
                let version = adapter.version().to_string();
                Ok((Box::new(adapter) as Box<dyn PlaceholderEngine>, version))
            },
            || Box::new(AbsentAdapter) as Box<dyn PlaceholderEngine>,
        );
        let custom_items = binder.bind(
            CapabilityKind::CustomItems,
            |entry| {
                let adapter = LiveItemSource::bind(entry)?;
                let version = adapter.version().to_string();
                Ok((Box::new(adapter) as Box<dyn ItemSource>, version))
            },
            || Box::new(AbsentAdapter) as Box<dyn ItemSource>,
        );
        let world_storage = binder.bind(
            CapabilityKind::WorldStorage,
            |entry| {
                let adapter = LiveWorldStorage::bind(entry)?;
                let version = adapter.version().to_string();
                Ok((Box::new(adapter) as Box<dyn WorldStorage>, version))
            },
            || Box::new(AbsentAdapter) as Box<dyn WorldStorage>,
        );

        for status in capabilities.iter() {
            if status.id.parse::<CapabilityKind>().is_err() {
                log::debug!("No adapter for unrecognized capability '{}'", status.id);
            }
        }

        Self {
            region_protection,
            placeholders,
            custom_items,
            world_storage,
            states: binder.states,
            warnings: binder.warnings,
        }
    }

    /// Registry with every capability absent.
    pub fn absent() -> Self {
        Self::build(&CapabilitySet::empty())
    }

    /// Adapter bound for `kind`: live, or the absent stand-in.
    pub fn get(&self, kind: CapabilityKind) -> AdapterRef<'_> {
        match kind {
            CapabilityKind::RegionProtection => AdapterRef::RegionProtection(self.region_protection.as_ref()),
            CapabilityKind::Placeholders => AdapterRef::Placeholders(self.placeholders.as_ref()),
            CapabilityKind::CustomItems => AdapterRef::CustomItems(self.custom_items.as_ref()),
            CapabilityKind::WorldStorage => AdapterRef::WorldStorage(self.world_storage.as_ref()),
        }
    }

    /// Same as [`get`](Self::get) for a capability id; `None` for ids no adapter exists for.
    pub fn get_by_id(&self, id: &str) -> Option<AdapterRef<'_>> {
        id.parse::<CapabilityKind>().ok().map(|kind| self.get(kind))
    }

    pub fn region_protection(&self) -> &dyn RegionProtection {
        self.region_protection.as_ref()
    }

    pub fn placeholders(&self) -> &dyn PlaceholderEngine {
        self.placeholders.as_ref()
    }

    pub fn custom_items(&self) -> &dyn ItemSource {
        self.custom_items.as_ref()
    }

    pub fn world_storage(&self) -> &dyn WorldStorage {
        self.world_storage.as_ref()
    }

    pub fn state(&self, kind: CapabilityKind) -> &BindingState {
        static ABSENT: BindingState = BindingState::Absent;
        self.states.get(&kind).unwrap_or(&ABSENT)
    }

    pub fn states(&self) -> impl Iterator<Item = (CapabilityKind, &BindingState)> {
        self.states.iter().map(|(kind, state)| (*kind, state))
    }

    /// Degraded-mode warnings recorded while binding.
    pub fn warnings(&self) -> &[DegradedWarning] {
        &self.warnings
    }

    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("states", &self.states)
            .field("warnings", &self.warnings.len())
            .finish()
    }
}
