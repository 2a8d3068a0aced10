use std::collections::BTreeMap;
use std::fmt;

use crate::capability::entry::EntryHandle;
use crate::capability::known::CapabilityKind;

/// Probe outcome for one capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityStatus {
    pub id: String,
    pub module: String,
    pub available: bool,
    /// Version reported by the module, when it was found at all.
    pub version: Option<String>,
    /// Why an unavailable capability was rejected.
    pub reason: Option<String>,
}

impl CapabilityStatus {
    pub fn available(id: &str, module: &str, version: &str) -> Self {
        Self {
            id: id.to_string(),
            module: module.to_string(),
            available: true,
            version: Some(version.to_string()),
            reason: None,
        }
    }

    pub fn unavailable(id: &str, module: &str, version: Option<&str>, reason: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            module: module.to_string(),
            available: false,
            version: version.map(str::to_owned),
            reason: Some(reason.into()),
        }
    }
}

/// Immutable result of the startup probe.
///
/// Maps capability ids to availability and version. The entry handle of
/// each available capability is retained so adapters bind to exactly what
/// the probe saw.
#[derive(Debug, Clone, Default)]
pub struct CapabilitySet {
    statuses: BTreeMap<String, CapabilityStatus>,
    entries: BTreeMap<String, EntryHandle>,
}

impl CapabilitySet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, status: CapabilityStatus, entry: Option<EntryHandle>) {
        match entry {
            Some(handle) if status.available => {
                self.entries.insert(status.id.clone(), handle);
            }
            _ => {
                self.entries.remove(&status.id);
            }
        }
        self.statuses.insert(status.id.clone(), status);
    }

    /// Empty set: every capability unavailable.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_available(&self, id: &str) -> bool {
        self.statuses.get(id).is_some_and(|s| s.available)
    }

    pub fn is_kind_available(&self, kind: CapabilityKind) -> bool {
        self.is_available(kind.id())
    }

    pub fn version(&self, id: &str) -> Option<&str> {
        self.statuses.get(id).filter(|s| s.available).and_then(|s| s.version.as_deref())
    }

    pub fn status(&self, id: &str) -> Option<&CapabilityStatus> {
        self.statuses.get(id)
    }

    pub fn entry(&self, id: &str) -> Option<&EntryHandle> {
        self.entries.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapabilityStatus> {
        self.statuses.values()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn available_count(&self) -> usize {
        self.statuses.values().filter(|s| s.available).count()
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} of {} capabilities available", self.available_count(), self.len())?;
        for status in self.statuses.values() {
            let mark = if status.available { "+" } else { "-" };
            write!(f, "  {} {} ({}", mark, status.id, status.module)?;
            if let Some(version) = &status.version {
                write!(f, " {}", version)?;
            }
            write!(f, ")")?;
            if let Some(reason) = &status.reason {
                write!(f, ": {}", reason)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
