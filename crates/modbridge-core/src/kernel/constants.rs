/// Application name
pub const APP_NAME: &str = "modbridge";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Symbol a native module library exports; returns a pointer to its vtable.
pub const ENTRY_SYMBOL: &[u8] = b"_modbridge_entry\0";

/// Module id whose presence marks a region-threaded host distribution.
pub const REGION_THREADING_MODULE: &str = "RegionizedServer";

/// Region size as a chunk shift: regions are 8x8 chunks.
pub const DEFAULT_REGION_SHIFT: u32 = 3;

/// Largest accepted region shift.
pub const MAX_REGION_SHIFT: u32 = 16;

/// Region worker count used when configuration asks for automatic sizing
/// and the platform cannot report its parallelism.
pub const DEFAULT_REGION_WORKERS: usize = 4;

/// Directory the CLI scans for native modules when none is given.
pub const DEFAULT_MODULES_DIR: &str = "modules";

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "modbridge.toml";
