use std::panic::{self, AssertUnwindSafe};

use crate::capability::entry::{panic_message, EntryHandle};
use crate::capability::known::KnownCapability;
use crate::capability::lookup::EntryPointLookup;
use crate::capability::set::{CapabilitySet, CapabilityStatus};
use crate::capability::version::parse_module_version;

/// Resolve every known capability against the running environment.
///
/// Never fails: a missing module, a lookup that panics, an unparsable
/// version, or a version outside the configured bounds each record the
/// capability as unavailable and the probe moves on to the next one.
pub fn probe(known: &[KnownCapability], lookup: &dyn EntryPointLookup) -> CapabilitySet {
    log::info!("Probing {} capabilities via {}", known.len(), lookup.describe());
    let mut set = CapabilitySet::new();

    for capability in known {
        let (status, entry) = probe_one(capability, lookup);
        if status.available {
            log::info!(
                "Capability '{}' available: {} v{}",
                status.id,
                status.module,
                status.version.as_deref().unwrap_or("?")
            );
        } else {
            log::warn!(
                "Capability '{}' unavailable ({}): {}",
                status.id,
                status.module,
                status.reason.as_deref().unwrap_or("unknown reason")
            );
        }
        set.record(status, entry);
    }

    log::info!("Probe finished: {} of {} capabilities available", set.available_count(), set.len());
    set
}

fn probe_one(
    capability: &KnownCapability,
    lookup: &dyn EntryPointLookup,
) -> (CapabilityStatus, Option<EntryHandle>) {
    let id = capability.id.as_str();
    let module = capability.module.as_str();

    let resolved = panic::catch_unwind(AssertUnwindSafe(|| lookup.resolve(module)));
    let handle = match resolved {
        Ok(Some(handle)) => handle,
        Ok(None) => return (CapabilityStatus::unavailable(id, module, None, "module not present"), None),
        Err(_) => {
            return (CapabilityStatus::unavailable(id, module, None, "entry point lookup panicked"), None);
        }
    };

    let raw_version = match panic::catch_unwind(AssertUnwindSafe(|| handle.version().to_string())) {
        Ok(v) => v,
        Err(payload) => {
            let reason = format!("module panicked reporting its version: {}", panic_message(payload.as_ref()));
            return (CapabilityStatus::unavailable(id, module, None, reason), None);
        }
    };
    let version = match parse_module_version(&raw_version) {
        Ok(v) => v,
        Err(e) => {
            return (CapabilityStatus::unavailable(id, module, Some(&raw_version), e.to_string()), None);
        }
    };

    if !capability.versions.contains(&version) {
        let reason = format!("version {} outside supported range {}", raw_version, capability.versions);
        return (CapabilityStatus::unavailable(id, module, Some(&raw_version), reason), None);
    }

    (CapabilityStatus::available(id, module, &raw_version), Some(handle))
}
