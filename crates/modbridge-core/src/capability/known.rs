use std::fmt;
use std::str::FromStr;

use crate::capability::version::VersionBounds;

/// The capability families this crate ships adapters for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CapabilityKind {
    RegionProtection,
    Placeholders,
    CustomItems,
    WorldStorage,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 4] = [
        CapabilityKind::RegionProtection,
        CapabilityKind::Placeholders,
        CapabilityKind::CustomItems,
        CapabilityKind::WorldStorage,
    ];

    /// Stable identifier used in configuration and host task submission.
    pub fn id(&self) -> &'static str {
        match self {
            CapabilityKind::RegionProtection => "regionProtection",
            CapabilityKind::Placeholders => "placeholders",
            CapabilityKind::CustomItems => "customItems",
            CapabilityKind::WorldStorage => "worldStorage",
        }
    }

    /// Module id probed for this capability when configuration does not say otherwise.
    pub fn default_module(&self) -> &'static str {
        match self {
            CapabilityKind::RegionProtection => "WorldGuard",
            CapabilityKind::Placeholders => "PlaceholderAPI",
            CapabilityKind::CustomItems => "NeigeItems",
            CapabilityKind::WorldStorage => "AdvancedSlimePaper",
        }
    }

    /// Region-scoped capabilities touch state owned by a spatial region and
    /// may only be used from that region's execution context.
    pub fn is_region_scoped(&self) -> bool {
        matches!(self, CapabilityKind::RegionProtection | CapabilityKind::WorldStorage)
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CapabilityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CapabilityKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| format!("Unknown capability id '{}'", s))
    }
}

/// A capability the host recognizes, with the module that provides it and
/// the module versions it is willing to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownCapability {
    pub id: String,
    pub module: String,
    pub versions: VersionBounds,
}

impl KnownCapability {
    pub fn new(id: &str, module: &str, versions: VersionBounds) -> Self {
        Self { id: id.to_string(), module: module.to_string(), versions }
    }

    /// The default entry for a built-in capability family, accepting any version.
    pub fn for_kind(kind: CapabilityKind) -> Self {
        Self::new(kind.id(), kind.default_module(), VersionBounds::any())
    }

    /// Built-in family this capability maps to, if any.
    pub fn kind(&self) -> Option<CapabilityKind> {
        self.id.parse().ok()
    }
}

/// Default registry of known capabilities: one per built-in family.
pub fn default_capabilities() -> Vec<KnownCapability> {
    CapabilityKind::ALL.iter().map(|kind| KnownCapability::for_kind(*kind)).collect()
}
