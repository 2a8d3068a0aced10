//! Minimal native module: `echo` hands the encoded arguments straight back.
use std::ffi::{c_void, CStr};
use std::os::raw::c_char;

const FFI_OK: i32 = 0;
const FFI_UNKNOWN_OPERATION: i32 = 1;

#[repr(C)]
pub struct FfiBuffer {
    pub data: *mut u8,
    pub len: usize,
    pub capacity: usize,
}

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

static VERSION: &[u8] = b"1.2.3\0";

extern "C-unwind" fn version(_instance: *const c_void) -> *const c_char {
    VERSION.as_ptr() as *const c_char
}

fn write_out(out: *mut FfiBuffer, bytes: Vec<u8>) {
    let mut bytes = std::mem::ManuallyDrop::new(bytes);
    // SAFETY: the loader passes a valid, writable buffer slot.
    unsafe {
        *out = FfiBuffer { data: bytes.as_mut_ptr(), len: bytes.len(), capacity: bytes.capacity() };
    }
}

extern "C-unwind" fn invoke(
    _instance: *const c_void,
    operation: *const c_char,
    args: *const u8,
    args_len: usize,
    out: *mut FfiBuffer,
) -> i32 {
    // SAFETY: the loader passes a NUL-terminated operation name.
    let operation = unsafe { CStr::from_ptr(operation) }.to_string_lossy();
    if operation != "echo" {
        write_out(out, format!("no operation '{}'", operation).into_bytes());
        return FFI_UNKNOWN_OPERATION;
    }
    // SAFETY: `args` points to `args_len` bytes for the duration of the call.
    let payload = unsafe { std::slice::from_raw_parts(args, args_len) }.to_vec();
    write_out(out, payload);
    FFI_OK
}

extern "C-unwind" fn free_buffer(buffer: FfiBuffer) {
    if !buffer.data.is_null() {
        // SAFETY: the buffer came from `write_out` and is released once.
        drop(unsafe { Vec::from_raw_parts(buffer.data, buffer.len, buffer.capacity) });
    }
}

extern "C-unwind" fn destroy(instance: *mut c_void) {
    // SAFETY: `instance` is the vtable allocated in the entry point.
    drop(unsafe { Box::from_raw(instance as *mut ModuleVTable) });
}

#[no_mangle]
pub extern "C-unwind" fn _modbridge_entry() -> *mut ModuleVTable {
    let vtable = Box::into_raw(Box::new(ModuleVTable {
        instance: std::ptr::null_mut(),
        version,
        invoke,
        free_buffer,
        destroy,
    }));
    // SAFETY: freshly allocated above.
    unsafe { (*vtable).instance = vtable as *mut c_void };
    vtable
}
