// Exports something, just not the entry symbol the loader asks for.
#[no_mangle]
pub extern "C" fn some_other_function() -> i32 {
    42
}
