//! # Tag Codec
//!
//! A structured binary tag format shared by item, world and module-call
//! payloads. [`TagValue`] is the in-memory tree; [`encode`] and [`decode`]
//! convert it to and from the versioned byte layout:
//!
//! ```text
//! version:u8  node
//! node      = marker:u8 payload
//! null 0x00 | bool 0x01 u8 | int 0x02 i64 | float 0x03 f64
//! string 0x04 len:u32 utf8 | list 0x05 count:u32 node* | map 0x06 count:u32 (len:u32 key node)*
//! ```
//!
//! All multi-byte integers are big-endian. The codec is purely functional
//! and holds no shared state.
pub mod codec;
pub mod error;
pub mod json;
pub mod value;

pub use codec::{decode, encode, FORMAT_VERSION, MAX_DEPTH};
pub use error::{TagError, TagResult};
pub use value::{TagMap, TagValue};

#[cfg(test)]
mod tests;
