use std::collections::HashMap;

use crate::capability::entry::EntryHandle;

/// Host-provided resolution of module identifiers to entry points.
///
/// This is the only contact point with whatever packages and loads the
/// extension modules. Implementations must not panic for unknown ids;
/// "not present" is `None`.
pub trait EntryPointLookup: Send + Sync {
    fn resolve(&self, module_id: &str) -> Option<EntryHandle>;

    /// Short description for log lines.
    fn describe(&self) -> String {
        "entry point lookup".to_string()
    }
}

/// In-memory table of entry points registered by the host.
#[derive(Default, Debug, Clone)]
pub struct StaticLookup {
    entries: HashMap<String, EntryHandle>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Register a handle under its own module id, replacing any earlier one.
    pub fn register(&mut self, handle: EntryHandle) -> &mut Self {
        self.entries.insert(handle.module_id().to_string(), handle);
        self
    }

    pub fn with(mut self, handle: EntryHandle) -> Self {
        self.register(handle);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntryPointLookup for StaticLookup {
    fn resolve(&self, module_id: &str) -> Option<EntryHandle> {
        self.entries.get(module_id).cloned()
    }

    fn describe(&self) -> String {
        format!("static lookup ({} modules)", self.entries.len())
    }
}

/// Tries several lookups in order and returns the first hit.
#[derive(Default)]
pub struct ChainedLookup {
    lookups: Vec<Box<dyn EntryPointLookup>>,
}

impl ChainedLookup {
    pub fn new() -> Self {
        Self { lookups: Vec::new() }
    }

    pub fn push<L: EntryPointLookup + 'static>(mut self, lookup: L) -> Self {
        self.lookups.push(Box::new(lookup));
        self
    }
}

impl EntryPointLookup for ChainedLookup {
    fn resolve(&self, module_id: &str) -> Option<EntryHandle> {
        self.lookups.iter().find_map(|lookup| lookup.resolve(module_id))
    }

    fn describe(&self) -> String {
        let parts: Vec<String> = self.lookups.iter().map(|l| l.describe()).collect();
        format!("chain [{}]", parts.join(", "))
    }
}
