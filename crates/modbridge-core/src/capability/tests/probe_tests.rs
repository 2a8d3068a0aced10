use crate::capability::{
    default_capabilities, probe, CapabilityKind, EntryError, EntryHandle, EntryPointLookup, KnownCapability,
    ModuleEntry, StaticEntry, StaticLookup, VersionBounds,
};
use crate::tag::TagValue;

fn module(id: &str, version: &str) -> EntryHandle {
    StaticEntry::new(id, version).into_handle()
}

/// Lookup that panics for one module id and delegates otherwise.
struct PanickyLookup {
    poisoned: &'static str,
    inner: StaticLookup,
}

impl EntryPointLookup for PanickyLookup {
    fn resolve(&self, module_id: &str) -> Option<EntryHandle> {
        if module_id == self.poisoned {
            panic!("lookup exploded for {}", module_id);
        }
        self.inner.resolve(module_id)
    }
}

/// Entry whose version accessor panics.
struct BrokenVersion;

impl ModuleEntry for BrokenVersion {
    fn module_id(&self) -> &str {
        "WorldGuard"
    }

    fn version(&self) -> &str {
        panic!("version table corrupted")
    }

    fn invoke(&self, _operation: &str, _args: &TagValue) -> Result<TagValue, EntryError> {
        Ok(TagValue::Null)
    }
}

#[test]
fn test_panicking_version_marks_unavailable() {
    let lookup = StaticLookup::new()
        .with(EntryHandle::from_entry(BrokenVersion))
        .with(module("PlaceholderAPI", "2.11.6"));
    let set = probe(&default_capabilities(), &lookup);

    let status = set.status(CapabilityKind::RegionProtection.id()).expect("status recorded");
    assert!(!status.available);
    assert!(status.reason.as_deref().unwrap_or_default().contains("version table corrupted"));
    assert!(set.entry(CapabilityKind::RegionProtection.id()).is_none());
    assert!(set.is_kind_available(CapabilityKind::Placeholders));
}

#[test]
fn test_probe_all_missing() {
    let set = probe(&default_capabilities(), &StaticLookup::new());
    assert_eq!(set.len(), 4);
    assert_eq!(set.available_count(), 0);
    for kind in CapabilityKind::ALL {
        assert!(!set.is_kind_available(kind));
        assert_eq!(set.status(kind.id()).and_then(|s| s.reason.as_deref()), Some("module not present"));
        assert!(set.entry(kind.id()).is_none());
    }
}

#[test]
fn test_probe_partial_presence() {
    let lookup = StaticLookup::new()
        .with(module("PlaceholderAPI", "2.11.6"))
        .with(module("NeigeItems", "1.21.42"));
    let set = probe(&default_capabilities(), &lookup);

    assert!(set.is_available("placeholders"));
    assert!(set.is_available("customItems"));
    assert!(!set.is_available("regionProtection"));
    assert!(!set.is_available("worldStorage"));
    assert_eq!(set.version("placeholders"), Some("2.11.6"));
    assert!(set.entry("placeholders").is_some());
    assert_eq!(set.available_count(), 2);
}

#[test]
fn test_probe_survives_panicking_lookup() {
    let lookup = PanickyLookup {
        poisoned: "WorldGuard",
        inner: StaticLookup::new().with(module("PlaceholderAPI", "2.11.6")),
    };
    let set = probe(&default_capabilities(), &lookup);

    let region = set.status("regionProtection").expect("status recorded");
    assert!(!region.available);
    assert!(region.reason.as_deref().unwrap_or_default().contains("panicked"));
    assert!(set.is_available("placeholders"));
}

#[test]
fn test_probe_rejects_out_of_range_version() {
    let known = vec![KnownCapability::new(
        "placeholders",
        "PlaceholderAPI",
        VersionBounds::parse(Some("2.10.0"), Some("2.11.99")).unwrap(),
    )];
    let lookup = StaticLookup::new().with(module("PlaceholderAPI", "3.0.0"));
    let set = probe(&known, &lookup);

    let status = set.status("placeholders").unwrap();
    assert!(!status.available);
    assert_eq!(status.version.as_deref(), Some("3.0.0"));
    assert!(status.reason.as_deref().unwrap().contains("outside supported range"));
    // Unavailable capabilities report no version and keep no entry
    assert_eq!(set.version("placeholders"), None);
    assert!(set.entry("placeholders").is_none());
}

#[test]
fn test_probe_rejects_unparsable_version() {
    let lookup = StaticLookup::new().with(module("WorldGuard", "seven"));
    let set = probe(&default_capabilities(), &lookup);
    assert!(!set.is_available("regionProtection"));
}

#[test]
fn test_probe_unrecognized_capability_ids_are_still_probed() {
    let known = vec![KnownCapability::new("economy", "Vault", VersionBounds::any())];
    let set = probe(&known, &StaticLookup::new().with(module("Vault", "1.7.3")));
    assert!(set.is_available("economy"));
    assert!(known[0].kind().is_none());
}

#[test]
fn test_capability_set_report() {
    let lookup = StaticLookup::new().with(module("PlaceholderAPI", "2.11.6"));
    let report = probe(&default_capabilities(), &lookup).to_string();
    assert!(report.starts_with("1 of 4 capabilities available"));
    assert!(report.contains("+ placeholders (PlaceholderAPI 2.11.6)"));
    assert!(report.contains("- regionProtection (WorldGuard): module not present"));
}

#[test]
fn test_capability_kind_ids_roundtrip() {
    for kind in CapabilityKind::ALL {
        assert_eq!(kind.id().parse::<CapabilityKind>(), Ok(kind));
    }
    assert!("nope".parse::<CapabilityKind>().is_err());
    assert!(CapabilityKind::RegionProtection.is_region_scoped());
    assert!(!CapabilityKind::Placeholders.is_region_scoped());
}
