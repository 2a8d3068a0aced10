use byteorder::{BigEndian, ByteOrder};

use crate::tag::error::{TagError, TagResult};
use crate::tag::value::{TagMap, TagValue};

/// Format version written as the first byte of every encoded tag.
pub const FORMAT_VERSION: u8 = 1;

/// Deepest nesting accepted by both directions of the codec.
pub const MAX_DEPTH: usize = 512;

const TAG_NULL: u8 = 0x00;
const TAG_BOOL: u8 = 0x01;
const TAG_INT: u8 = 0x02;
const TAG_FLOAT: u8 = 0x03;
const TAG_STRING: u8 = 0x04;
const TAG_LIST: u8 = 0x05;
const TAG_MAP: u8 = 0x06;

/// Encode a tag tree into its versioned byte form.
///
/// Fails only for values the wire format cannot carry: strings, lists or
/// maps longer than `u32::MAX`, or trees nested deeper than [`MAX_DEPTH`].
pub fn encode(value: &TagValue) -> TagResult<Vec<u8>> {
    let mut out = Vec::with_capacity(16);
    out.push(FORMAT_VERSION);
    write_node(&mut out, value, 1)?;
    Ok(out)
}

/// Decode a versioned byte stream back into a tag tree.
///
/// The version byte is checked before any node is read, and the whole
/// buffer must be consumed; nothing partial is ever returned.
pub fn decode(bytes: &[u8]) -> TagResult<TagValue> {
    let (&version, _) = bytes
        .split_first()
        .ok_or_else(|| TagError::malformed(0, "empty input, expected format version"))?;
    if version > FORMAT_VERSION {
        return Err(TagError::UnsupportedVersion { found: version, supported: FORMAT_VERSION });
    }
    if version == 0 {
        return Err(TagError::malformed(0, "format version 0 is not defined"));
    }

    let mut reader = Reader { bytes, pos: 1 };
    let value = reader.read_node(1)?;
    if reader.pos != bytes.len() {
        return Err(TagError::malformed(
            reader.pos,
            format!("{} trailing bytes after root value", bytes.len() - reader.pos),
        ));
    }
    Ok(value)
}

fn write_len(out: &mut Vec<u8>, len: usize, what: &str) -> TagResult<()> {
    let len = u32::try_from(len).map_err(|_| TagError::Unencodable {
        reason: format!("{} length {} exceeds u32::MAX", what, len),
    })?;
    let mut buf = [0u8; 4];
    BigEndian::write_u32(&mut buf, len);
    out.extend_from_slice(&buf);
    Ok(())
}

fn write_str(out: &mut Vec<u8>, s: &str, what: &str) -> TagResult<()> {
    write_len(out, s.len(), what)?;
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

fn write_node(out: &mut Vec<u8>, value: &TagValue, depth: usize) -> TagResult<()> {
    if depth > MAX_DEPTH {
        return Err(TagError::Unencodable {
            reason: format!("nesting deeper than {} levels", MAX_DEPTH),
        });
    }
    match value {
        TagValue::Null => out.push(TAG_NULL),
        TagValue::Bool(b) => {
            out.push(TAG_BOOL);
            out.push(u8::from(*b));
        }
        TagValue::Int(i) => {
            out.push(TAG_INT);
            let mut buf = [0u8; 8];
            BigEndian::write_i64(&mut buf, *i);
            out.extend_from_slice(&buf);
        }
        TagValue::Float(x) => {
            out.push(TAG_FLOAT);
            let mut buf = [0u8; 8];
            BigEndian::write_f64(&mut buf, *x);
            out.extend_from_slice(&buf);
        }
        TagValue::String(s) => {
            out.push(TAG_STRING);
            write_str(out, s, "string")?;
        }
        TagValue::List(items) => {
            out.push(TAG_LIST);
            write_len(out, items.len(), "list")?;
            for item in items {
                write_node(out, item, depth + 1)?;
            }
        }
        TagValue::Map(map) => {
            out.push(TAG_MAP);
            write_len(out, map.len(), "map")?;
            for (key, item) in map {
                write_str(out, key, "map key")?;
                write_node(out, item, depth + 1)?;
            }
        }
    }
    Ok(())
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize, what: &str) -> TagResult<&'a [u8]> {
        let remaining = self.bytes.len() - self.pos;
        if n > remaining {
            return Err(TagError::malformed(
                self.pos,
                format!("{} needs {} bytes but only {} remain", what, n, remaining),
            ));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u8(&mut self, what: &str) -> TagResult<u8> {
        Ok(self.take(1, what)?[0])
    }

    fn read_len(&mut self, what: &str) -> TagResult<usize> {
        let raw = BigEndian::read_u32(self.take(4, what)?);
        Ok(raw as usize)
    }

    fn read_string(&mut self, what: &str) -> TagResult<String> {
        let len = self.read_len(what)?;
        let start = self.pos;
        let raw = self.take(len, what)?;
        // from_utf8 also rejects encoded surrogate halves
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|e| TagError::malformed(start + e.valid_up_to(), format!("{} is not valid UTF-8", what)))
    }

    /// Every element needs at least one byte, so a count larger than the
    /// remaining input is rejected before anything is allocated.
    fn check_count(&self, count: usize, what: &str) -> TagResult<()> {
        let remaining = self.bytes.len() - self.pos;
        if count > remaining {
            return Err(TagError::malformed(
                self.pos,
                format!("{} declares {} entries but only {} bytes remain", what, count, remaining),
            ));
        }
        Ok(())
    }

    fn read_node(&mut self, depth: usize) -> TagResult<TagValue> {
        let marker_pos = self.pos;
        if depth > MAX_DEPTH {
            return Err(TagError::malformed(marker_pos, format!("nesting deeper than {} levels", MAX_DEPTH)));
        }
        let marker = self.read_u8("type marker")?;
        match marker {
            TAG_NULL => Ok(TagValue::Null),
            TAG_BOOL => match self.read_u8("boolean")? {
                0 => Ok(TagValue::Bool(false)),
                1 => Ok(TagValue::Bool(true)),
                other => Err(TagError::malformed(marker_pos + 1, format!("invalid boolean byte {:#04x}", other))),
            },
            TAG_INT => Ok(TagValue::Int(BigEndian::read_i64(self.take(8, "integer")?))),
            TAG_FLOAT => Ok(TagValue::Float(BigEndian::read_f64(self.take(8, "float")?))),
            TAG_STRING => Ok(TagValue::String(self.read_string("string")?)),
            TAG_LIST => {
                let count = self.read_len("list count")?;
                self.check_count(count, "list")?;
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.read_node(depth + 1)?);
                }
                Ok(TagValue::List(items))
            }
            TAG_MAP => {
                let count = self.read_len("map count")?;
                self.check_count(count, "map")?;
                let mut map = TagMap::with_capacity(count);
                for _ in 0..count {
                    let key_pos = self.pos;
                    let key = self.read_string("map key")?;
                    let value = self.read_node(depth + 1)?;
                    if map.insert(key, value).is_some() {
                        return Err(TagError::malformed(key_pos, "duplicate map key"));
                    }
                }
                Ok(TagValue::Map(map))
            }
            other => Err(TagError::malformed(marker_pos, format!("unknown type marker {:#04x}", other))),
        }
    }
}
