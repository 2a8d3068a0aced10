//! # Tag Codec Errors
//!
//! Defines [`TagError`], returned by [`decode`](super::decode) when a byte
//! stream cannot be turned back into a [`TagValue`](super::TagValue), and by
//! [`encode`](super::encode) for the few values the wire format cannot carry.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// Type markers or length prefixes are inconsistent with the buffer.
    #[error("Malformed tag data at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: String },

    /// The leading format-version byte is newer than this build understands.
    #[error("Unsupported tag format version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u8, supported: u8 },

    /// The value exceeds a limit of the wire format (u32 lengths, nesting depth).
    #[error("Tag value cannot be encoded: {reason}")]
    Unencodable { reason: String },
}

impl TagError {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        TagError::Malformed { offset, reason: reason.into() }
    }
}

/// Shorthand for Result with TagError
pub type TagResult<T> = std::result::Result<T, TagError>;
