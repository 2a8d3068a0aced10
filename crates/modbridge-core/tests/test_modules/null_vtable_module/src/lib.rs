use std::os::raw::c_void;

#[no_mangle]
pub extern "C-unwind" fn _modbridge_entry() -> *mut c_void {
    std::ptr::null_mut()
}
