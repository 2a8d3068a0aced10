//! Discovery of extension modules shipped as native shared libraries.
//!
//! A module library exports [`ENTRY_SYMBOL`] returning a pointer to a
//! [`ModuleVTable`]. Arguments and results cross the boundary as tag-codec
//! bytes, so the only shared types are the ones declared here.
use std::collections::HashMap;
use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use libloading::{Library, Symbol};

use crate::capability::entry::{panic_message, EntryHandle, ModuleEntry};
use crate::capability::error::EntryError;
use crate::capability::lookup::EntryPointLookup;
use crate::kernel::constants::ENTRY_SYMBOL;
use crate::tag::{self, TagValue};

/// Status codes returned by [`ModuleVTable::invoke`].
pub const FFI_OK: i32 = 0;
pub const FFI_UNKNOWN_OPERATION: i32 = 1;
pub const FFI_INVALID_ARGUMENTS: i32 = 2;
pub const FFI_FAILED: i32 = 3;

/// Byte buffer allocated by the module and released with `free_buffer`.
#[repr(C)]
#[derive(Debug)]
pub struct FfiBuffer {
    pub data: *mut u8,
    pub len: usize,
    pub capacity: usize,
}

impl FfiBuffer {
    fn empty() -> Self {
        Self { data: std::ptr::null_mut(), len: 0, capacity: 0 }
    }

    /// # Safety
    /// `data` must be null or point to `len` initialized bytes.
    unsafe fn as_slice(&self) -> &[u8] {
        if self.data.is_null() || self.len == 0 {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(self.data, self.len) }
        }
    }
}

/// Function table exported by a native module.
///
/// The module owns both the instance and the table; `destroy` must release
/// both. `version` returns a string that stays valid until `destroy`.
/// On a non-OK status `out` may hold a UTF-8 error message. The functions
/// use the unwinding ABI so a panicking `invoke` reaches the host's
/// `catch_unwind` instead of aborting.
#[repr(C)]
pub struct ModuleVTable {
    pub instance: *mut c_void,
    pub version: extern "C-unwind" fn(instance: *const c_void) -> *const c_char,
    pub invoke: extern "C-unwind" fn(
        instance: *const c_void,
        operation: *const c_char,
        args: *const u8,
        args_len: usize,
        out: *mut FfiBuffer,
    ) -> i32,
    pub free_buffer: extern "C-unwind" fn(buffer: FfiBuffer),
    pub destroy: extern "C-unwind" fn(instance: *mut c_void),
}

type EntryInitFn = unsafe extern "C-unwind" fn() -> *mut ModuleVTable;

#[derive(Debug, Clone, Copy)]
struct VTablePtr(*mut ModuleVTable);
// SAFETY: the module contract requires the vtable functions to be callable
// from any thread; the pointer itself is never mutated after load.
unsafe impl Send for VTablePtr {}
// SAFETY: see above.
unsafe impl Sync for VTablePtr {}

/// Entry point backed by a loaded shared library.
pub(crate) struct NativeModuleEntry {
    module_id: String,
    version: String,
    vtable: VTablePtr,
    // Dropped after `destroy` has run
    library: Option<Library>,
}

impl NativeModuleEntry {
    fn load(module_id: &str, path: &Path) -> Result<Self, String> {
        // SAFETY: loading runs the library's initializers; modules placed in
        // the search directories are trusted by the host.
        let library = unsafe { Library::new(path) }.map_err(|e| format!("libloading error: {}", e))?;

        let func: EntryInitFn = {
            // SAFETY: the symbol type is fixed by the module ABI.
            let symbol: Symbol<EntryInitFn> = unsafe { library.get(ENTRY_SYMBOL) }
                .map_err(|e| format!("missing entry symbol: {}", e))?;
            *symbol
        };

        // SAFETY: calling the module's exported initializer.
        let vtable_ptr = panic::catch_unwind(|| unsafe { func() })
            .map_err(|payload| format!("entry initializer panicked: {}", panic_message(payload.as_ref())))?;
        if vtable_ptr.is_null() {
            return Err("entry initializer returned a null vtable".to_string());
        }

        // SAFETY: non-null vtable freshly returned by the module's initializer.
        let mut entry = unsafe { Self::from_vtable(module_id, vtable_ptr) }?;
        entry.library = Some(library);
        Ok(entry)
    }

    /// Wrap a vtable that is already initialized, reading its version.
    ///
    /// # Safety
    /// `vtable_ptr` must be non-null and satisfy the [`ModuleVTable`]
    /// contract until the entry is dropped.
    pub(crate) unsafe fn from_vtable(module_id: &str, vtable_ptr: *mut ModuleVTable) -> Result<Self, String> {
        // SAFETY: non-null pointer returned by the module, valid until destroy.
        let vtable = unsafe { &*vtable_ptr };
        let instance = vtable.instance as *const c_void;
        let version_ptr =
            panic::catch_unwind(panic::AssertUnwindSafe(|| (vtable.version)(instance))).unwrap_or(std::ptr::null());
        let version = if version_ptr.is_null() {
            Err("module reported no version".to_string())
        } else {
            // SAFETY: the module guarantees a NUL-terminated string.
            unsafe { CStr::from_ptr(version_ptr) }
                .to_str()
                .map(str::to_owned)
                .map_err(|_| "module version is not valid UTF-8".to_string())
        };
        let version = match version {
            Ok(v) => v,
            Err(e) => {
                (vtable.destroy)(vtable.instance);
                return Err(e);
            }
        };

        Ok(Self { module_id: module_id.to_string(), version, vtable: VTablePtr(vtable_ptr), library: None })
    }

    fn error_message(&self, out: &FfiBuffer) -> String {
        // SAFETY: buffer produced by the module per the ABI.
        let bytes = unsafe { out.as_slice() };
        if bytes.is_empty() {
            "no message".to_string()
        } else {
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

impl ModuleEntry for NativeModuleEntry {
    fn module_id(&self) -> &str {
        &self.module_id
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn invoke(&self, operation: &str, args: &TagValue) -> Result<TagValue, EntryError> {
        let op = CString::new(operation).map_err(|_| EntryError::InvalidArguments {
            module: self.module_id.clone(),
            operation: operation.to_string(),
            message: "operation name contains NUL".to_string(),
        })?;
        let payload = tag::encode(args)?;
        let vtable_ptr = self.vtable;

        let mut out = FfiBuffer::empty();
        let out_ptr = &mut out as *mut FfiBuffer;
        let status = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            // SAFETY: vtable is valid while `self` lives; pointers outlive the call.
            let vtable = unsafe { &*vtable_ptr.0 };
            (vtable.invoke)(vtable.instance as *const c_void, op.as_ptr(), payload.as_ptr(), payload.len(), out_ptr)
        }))
        .map_err(|payload| EntryError::Panicked {
            module: self.module_id.clone(),
            operation: operation.to_string(),
            message: panic_message(payload.as_ref()),
        })?;

        let result = match status {
            // SAFETY: buffer produced by the module per the ABI.
            FFI_OK => tag::decode(unsafe { out.as_slice() }).map_err(EntryError::from),
            FFI_UNKNOWN_OPERATION => Err(EntryError::UnknownOperation {
                module: self.module_id.clone(),
                operation: operation.to_string(),
            }),
            FFI_INVALID_ARGUMENTS => Err(EntryError::InvalidArguments {
                module: self.module_id.clone(),
                operation: operation.to_string(),
                message: self.error_message(&out),
            }),
            other => Err(EntryError::Failed {
                module: self.module_id.clone(),
                operation: operation.to_string(),
                message: format!("status {}: {}", other, self.error_message(&out)),
            }),
        };

        if !out.data.is_null() {
            // SAFETY: valid vtable; buffer handed back exactly once.
            let vtable = unsafe { &*vtable_ptr.0 };
            (vtable.free_buffer)(out);
        }
        result
    }
}

impl Drop for NativeModuleEntry {
    fn drop(&mut self) {
        if !self.vtable.0.is_null() {
            // SAFETY: the vtable is valid until destroy, which runs once here.
            let vtable = unsafe { &*self.vtable.0 };
            let instance = vtable.instance;
            if panic::catch_unwind(panic::AssertUnwindSafe(|| (vtable.destroy)(instance))).is_err() {
                log::warn!("Module '{}' panicked while being destroyed", self.module_id);
            }
            self.vtable.0 = std::ptr::null_mut();
        }
        drop(self.library.take());
    }
}

/// Resolves modules from shared libraries in a list of directories.
///
/// `PlaceholderAPI` is looked up as `libPlaceholderAPI.so` on Linux,
/// `libPlaceholderAPI.dylib` on macOS and `PlaceholderAPI.dll` on Windows.
/// A library is loaded at most once; later lookups reuse the handle.
#[derive(Default)]
pub struct NativeLibraryLookup {
    search_dirs: Vec<PathBuf>,
    loaded: Mutex<HashMap<String, EntryHandle>>,
}

impl NativeLibraryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory to search
    pub fn add_search_dir<P: AsRef<Path>>(&mut self, dir: P) {
        self.search_dirs.push(dir.as_ref().to_path_buf());
    }

    pub fn with_search_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.add_search_dir(dir);
        self
    }

    /// Path the library for `module_id` would have in `dir`.
    pub fn library_path(dir: &Path, module_id: &str) -> PathBuf {
        dir.join(libloading::library_filename(module_id))
    }

    fn load_from_dirs(&self, module_id: &str) -> Option<EntryHandle> {
        for dir in &self.search_dirs {
            let path = Self::library_path(dir, module_id);
            if !path.is_file() {
                continue;
            }
            match NativeModuleEntry::load(module_id, &path) {
                Ok(entry) => {
                    log::debug!("Loaded module '{}' v{} from {}", module_id, entry.version, path.display());
                    return Some(EntryHandle::from_entry(entry));
                }
                Err(e) => {
                    log::warn!("Ignoring module library {}: {}", path.display(), e);
                }
            }
        }
        None
    }
}

impl EntryPointLookup for NativeLibraryLookup {
    fn resolve(&self, module_id: &str) -> Option<EntryHandle> {
        // A poisoned cache only means another resolve panicked mid-insert
        let mut loaded = match self.loaded.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handle) = loaded.get(module_id) {
            return Some(handle.clone());
        }
        let handle = self.load_from_dirs(module_id)?;
        loaded.insert(module_id.to_string(), handle.clone());
        Some(handle)
    }

    fn describe(&self) -> String {
        let dirs: Vec<String> = self.search_dirs.iter().map(|d| d.display().to_string()).collect();
        format!("native libraries in [{}]", dirs.join(", "))
    }
}
