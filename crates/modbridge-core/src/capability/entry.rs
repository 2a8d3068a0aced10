use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::capability::error::EntryError;
use crate::tag::TagValue;

/// Name of the handshake operation every entry point answers.
///
/// The reply is a map with at least an `operations` list naming the
/// operations the module supports.
pub const DESCRIBE_OPERATION: &str = "describe";

/// Text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic reason".to_string()
    }
}

/// Callable entry point of an extension module.
///
/// Arguments and results travel as [`TagValue`] trees so that in-process
/// and native modules share one calling convention.
pub trait ModuleEntry: Send + Sync {
    fn module_id(&self) -> &str;

    /// Version string as reported by the module itself.
    fn version(&self) -> &str;

    fn invoke(&self, operation: &str, args: &TagValue) -> Result<TagValue, EntryError>;
}

/// Cheaply clonable handle to a resolved entry point.
#[derive(Clone)]
pub struct EntryHandle {
    inner: Arc<dyn ModuleEntry>,
}

impl EntryHandle {
    pub fn new(entry: Arc<dyn ModuleEntry>) -> Self {
        Self { inner: entry }
    }

    pub fn from_entry<E: ModuleEntry + 'static>(entry: E) -> Self {
        Self { inner: Arc::new(entry) }
    }

    pub fn module_id(&self) -> &str {
        self.inner.module_id()
    }

    pub fn version(&self) -> &str {
        self.inner.version()
    }

    pub fn invoke(&self, operation: &str, args: &TagValue) -> Result<TagValue, EntryError> {
        self.inner.invoke(operation, args)
    }

    /// Ask the module which operations it supports.
    pub fn operations(&self) -> Result<Vec<String>, EntryError> {
        let reply = self.invoke(DESCRIBE_OPERATION, &TagValue::Null)?;
        let ops = reply
            .get("operations")
            .and_then(TagValue::as_list)
            .ok_or_else(|| EntryError::Failed {
                module: self.module_id().to_string(),
                operation: DESCRIBE_OPERATION.to_string(),
                message: format!("expected map with an 'operations' list, got {}", reply.type_name()),
            })?;
        Ok(ops.iter().filter_map(TagValue::as_str).map(str::to_owned).collect())
    }
}

impl fmt::Debug for EntryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryHandle")
            .field("module_id", &self.module_id())
            .field("version", &self.version())
            .finish()
    }
}

type OperationFn = Box<dyn Fn(&TagValue) -> Result<TagValue, String> + Send + Sync>;

/// In-process module entry assembled from closures.
///
/// Hosts use this to expose statically linked modules; it also answers the
/// `describe` handshake automatically from the registered operation names.
pub struct StaticEntry {
    module_id: String,
    version: String,
    operations: HashMap<String, OperationFn>,
    order: Vec<String>,
}

impl StaticEntry {
    pub fn new(module_id: &str, version: &str) -> Self {
        Self {
            module_id: module_id.to_string(),
            version: version.to_string(),
            operations: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register an operation handler. Handler errors surface as [`EntryError::Failed`].
    pub fn operation<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&TagValue) -> Result<TagValue, String> + Send + Sync + 'static,
    {
        if self.operations.insert(name.to_string(), Box::new(handler)).is_none() {
            self.order.push(name.to_string());
        }
        self
    }

    pub fn into_handle(self) -> EntryHandle {
        EntryHandle::from_entry(self)
    }
}

impl ModuleEntry for StaticEntry {
    fn module_id(&self) -> &str {
        &self.module_id
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn invoke(&self, operation: &str, args: &TagValue) -> Result<TagValue, EntryError> {
        if operation == DESCRIBE_OPERATION && !self.operations.contains_key(DESCRIBE_OPERATION) {
            let ops = self.order.iter().map(|name| TagValue::from(name.as_str())).collect::<Vec<_>>();
            return Ok(TagValue::map()
                .with("module", self.module_id.as_str())
                .with("version", self.version.as_str())
                .with("operations", TagValue::List(ops)));
        }
        let handler = self.operations.get(operation).ok_or_else(|| EntryError::UnknownOperation {
            module: self.module_id.clone(),
            operation: operation.to_string(),
        })?;
        handler(args).map_err(|message| EntryError::Failed {
            module: self.module_id.clone(),
            operation: operation.to_string(),
            message,
        })
    }
}
