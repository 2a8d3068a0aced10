use super::fixtures::{all_present, capabilities, item_module, placeholder_module, storage_module};
use crate::adapter::{AdapterRegistry, BindingError, BindingState, SubstitutionContext};
use crate::capability::{CapabilityKind, CapabilitySet, EntryError, StaticEntry};
use crate::scheduler::{BlockPos, ChunkPos};
use crate::tag::TagValue;

fn assert_neutral(registry: &AdapterRegistry) {
    let block = BlockPos::new("world", 5, 64, 5);
    let chunk = block.chunk();

    let regions = registry.get(CapabilityKind::RegionProtection).as_region_protection().unwrap();
    assert!(regions.region_at(&block).is_none());
    assert!(regions.can_build("anyone", &block));

    let placeholders = registry.get(CapabilityKind::Placeholders).as_placeholders().unwrap();
    assert_eq!(placeholders.substitute("%player_name%", &SubstitutionContext::for_player("Alex")), "%player_name%");

    let items = registry.get(CapabilityKind::CustomItems).as_custom_items().unwrap();
    assert!(items.query_item("ruby").is_none());
    assert!(items.custom_id_of(&TagValue::map()).is_none());

    let storage = registry.get(CapabilityKind::WorldStorage).as_world_storage().unwrap();
    assert!(storage.read_chunk(&chunk).is_none());
    assert_eq!(storage.write_chunk(&chunk, &TagValue::map()), Ok(()));
    assert!(!storage.world_known("world"));
}

#[test]
fn test_empty_capabilities_bind_absent_adapters() {
    let registry = AdapterRegistry::build(&CapabilitySet::empty());
    for kind in CapabilityKind::ALL {
        assert_eq!(registry.state(kind), &BindingState::Absent);
    }
    assert!(registry.warnings().is_empty());
    assert!(!registry.is_degraded());
    assert_neutral(&registry);
}

#[test]
fn test_probed_but_missing_modules_are_absent() {
    let registry = AdapterRegistry::build(&capabilities(Vec::new()));
    assert_neutral(&registry);
    assert_eq!(registry.states().count(), 4);
}

#[test]
fn test_all_present_bind_live() {
    let registry = AdapterRegistry::build(&all_present());
    for kind in CapabilityKind::ALL {
        assert!(registry.state(kind).is_live(), "{} should be live", kind);
    }
    assert_eq!(
        registry.state(CapabilityKind::WorldStorage),
        &BindingState::Live { module: "AdvancedSlimePaper".to_string(), version: "4.0.0-SNAPSHOT".to_string() }
    );
    assert!(registry.world_storage().world_known("slime"));
    assert!(registry.custom_items().query_item("ruby").is_some());
}

#[test]
fn test_partial_presence() {
    let registry = AdapterRegistry::build(&capabilities(vec![placeholder_module("2.11.6")]));
    assert!(registry.state(CapabilityKind::Placeholders).is_live());
    assert_eq!(registry.state(CapabilityKind::RegionProtection), &BindingState::Absent);

    let pos = BlockPos::new("world", 0, 64, 0);
    assert!(registry.region_protection().can_build("Alex", &pos));
    assert!(registry.region_protection().region_at(&pos).is_none());
    assert_eq!(
        registry.placeholders().substitute("Hi %player_name%", &SubstitutionContext::for_player("Alex")),
        "Hi Alex"
    );
}

#[test]
fn test_incompatible_version_degrades_only_that_capability() {
    let set = capabilities(vec![placeholder_module("3.0.0"), item_module("1.21.42")]);
    assert!(set.is_kind_available(CapabilityKind::Placeholders));

    let registry = AdapterRegistry::build(&set);
    assert!(registry.state(CapabilityKind::CustomItems).is_live());
    assert!(registry.state(CapabilityKind::Placeholders).is_degraded());
    assert!(registry.is_degraded());

    let warnings = registry.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].capability, CapabilityKind::Placeholders);
    assert_eq!(warnings[0].module, "PlaceholderAPI");
    assert!(matches!(warnings[0].error, BindingError::VersionMismatch { .. }));
    assert!(warnings[0].to_string().starts_with("placeholders running without PlaceholderAPI"));

    // Degraded capability behaves exactly like an absent one
    assert_eq!(registry.placeholders().substitute("%a%", &SubstitutionContext::new()), "%a%");
}

#[test]
fn test_panicking_handshake_degrades_instead_of_aborting() {
    let exploding = StaticEntry::new("PlaceholderAPI", "2.11.0")
        .operation("describe", |_| panic!("describe exploded"))
        .operation("setPlaceholders", |args| Ok(args.clone()))
        .into_handle();
    let registry = AdapterRegistry::build(&capabilities(vec![exploding, item_module("1.21.42")]));

    assert!(registry.state(CapabilityKind::Placeholders).is_degraded());
    assert!(registry.state(CapabilityKind::CustomItems).is_live());

    let warnings = registry.warnings();
    assert_eq!(warnings.len(), 1);
    match &warnings[0].error {
        BindingError::Handshake { module, source: EntryError::Panicked { operation, message, .. } } => {
            assert_eq!(module, "PlaceholderAPI");
            assert_eq!(operation, "describe");
            assert!(message.contains("describe exploded"));
        }
        other => panic!("Expected a panicked handshake, got {:?}", other),
    }
    assert_eq!(registry.placeholders().substitute("%a%", &SubstitutionContext::new()), "%a%");
}

#[test]
fn test_get_by_id() {
    let registry = AdapterRegistry::build(&capabilities(vec![storage_module("3.9.1")]));
    let adapter = registry.get_by_id("worldStorage").unwrap();
    assert_eq!(adapter.kind(), CapabilityKind::WorldStorage);
    assert!(adapter.as_world_storage().unwrap().read_chunk(&ChunkPos::new("slime", 0, 0)).is_some());
    assert!(adapter.as_placeholders().is_none());

    assert!(registry.get_by_id("economy").is_none());
    assert!(registry.get_by_id("").is_none());
}

#[test]
fn test_binding_state_display() {
    assert_eq!(BindingState::Absent.to_string(), "absent");
    assert_eq!(
        BindingState::Live { module: "WorldGuard".to_string(), version: "7.0.9".to_string() }.to_string(),
        "live (WorldGuard 7.0.9)"
    );
}
