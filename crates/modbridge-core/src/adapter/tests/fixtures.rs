//! In-process stand-ins for the four module families.

use crate::capability::{default_capabilities, probe, CapabilitySet, EntryHandle, StaticEntry, StaticLookup};
use crate::tag::TagValue;

pub fn region_module(version: &str) -> EntryHandle {
    StaticEntry::new("WorldGuard", version)
        .operation("regionAt", |args| {
            let x = args.get("x").and_then(TagValue::as_i64).unwrap_or_default();
            if x < 0 {
                return Ok(TagValue::Null);
            }
            Ok(TagValue::map()
                .with("id", "spawn")
                .with("priority", 10i64)
                .with("owners", vec![TagValue::from("admin")])
                .with("members", vec![TagValue::from("alice"), TagValue::from("bob")]))
        })
        .operation("canBuild", |args| {
            Ok(TagValue::from(args.get("player").and_then(TagValue::as_str) == Some("admin")))
        })
        .into_handle()
}

pub fn placeholder_module(version: &str) -> EntryHandle {
    StaticEntry::new("PlaceholderAPI", version)
        .operation("setPlaceholders", |args| {
            let text = args.get("text").and_then(TagValue::as_str).ok_or("missing text")?;
            let player = args.get("player").and_then(TagValue::as_str).unwrap_or("nobody");
            Ok(TagValue::from(text.replace("%player_name%", player)))
        })
        .into_handle()
}

pub fn item_module(version: &str) -> EntryHandle {
    StaticEntry::new("NeigeItems", version)
        .operation("getItem", |args| match args.get("id").and_then(TagValue::as_str) {
            Some("ruby") => Ok(TagValue::map()
                .with("id", "ruby")
                .with("name", "Ruby")
                .with("material", "EMERALD")
                .with("data", TagValue::map().with("CustomModelData", 1001i64))),
            _ => Ok(TagValue::Null),
        })
        .operation("itemId", |args| {
            Ok(TagValue::from(args.get_path("item.tag.NeigeItems.id").and_then(TagValue::as_str)))
        })
        .into_handle()
}

pub fn storage_module(version: &str) -> EntryHandle {
    StaticEntry::new("AdvancedSlimePaper", version)
        .operation("readChunk", |args| {
            if args.get("world").and_then(TagValue::as_str) != Some("slime") {
                return Ok(TagValue::Null);
            }
            Ok(TagValue::map().with("x", args.get("x").cloned()).with("z", args.get("z").cloned()))
        })
        .operation("writeChunk", |_| Ok(TagValue::from(true)))
        .operation("worldExists", |args| Ok(TagValue::from(args.get("world").and_then(TagValue::as_str) == Some("slime"))))
        .into_handle()
}

/// Probe the default capabilities against exactly `modules`.
pub fn capabilities(modules: Vec<EntryHandle>) -> CapabilitySet {
    let mut lookup = StaticLookup::new();
    for module in modules {
        lookup.register(module);
    }
    probe(&default_capabilities(), &lookup)
}

/// Every module present at a supported version.
pub fn all_present() -> CapabilitySet {
    capabilities(vec![
        region_module("7.0.9"),
        placeholder_module("2.11.6"),
        item_module("1.21.42"),
        storage_module("4.0.0-SNAPSHOT"),
    ])
}
