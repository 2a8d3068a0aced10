use std::fmt;

use indexmap::IndexMap;

/// Insertion-ordered map backing [`TagValue::Map`].
pub type TagMap = IndexMap<String, TagValue>;

/// In-memory form of a structured tag.
///
/// Values are plain trees: every list and map owns its children, so cycles
/// cannot be built. Equality is order-sensitive for maps and compares floats
/// bitwise, which makes `decode(encode(v)) == v` hold for every value
/// including NaN payloads.
#[derive(Debug, Clone)]
pub enum TagValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<TagValue>),
    Map(TagMap),
}

impl TagValue {
    /// Create an empty map value
    pub fn map() -> Self {
        TagValue::Map(TagMap::new())
    }

    /// Create an empty list value
    pub fn list() -> Self {
        TagValue::List(Vec::new())
    }

    /// Builder-style insert. Has no effect unless `self` is a map.
    pub fn with(mut self, key: &str, value: impl Into<TagValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert into a map value, returning the previous entry for `key`.
    /// Non-map values are left untouched and `None` is returned.
    pub fn insert(&mut self, key: &str, value: impl Into<TagValue>) -> Option<TagValue> {
        match self {
            TagValue::Map(map) => map.insert(key.to_string(), value.into()),
            _ => None,
        }
    }

    /// Append to a list value. Returns false if `self` is not a list.
    pub fn push(&mut self, value: impl Into<TagValue>) -> bool {
        match self {
            TagValue::List(list) => {
                list.push(value.into());
                true
            }
            _ => false,
        }
    }

    /// Human readable name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            TagValue::Null => "null",
            TagValue::Bool(_) => "boolean",
            TagValue::Int(_) => "integer",
            TagValue::Float(_) => "float",
            TagValue::String(_) => "string",
            TagValue::List(_) => "list",
            TagValue::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TagValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TagValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TagValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TagValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TagValue]> {
        match self {
            TagValue::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&TagMap> {
        match self {
            TagValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a direct child of a map value.
    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Walk a dotted path through nested maps, e.g. `"display.lore"`.
    /// Numeric segments index into lists.
    pub fn get_path(&self, path: &str) -> Option<&TagValue> {
        path.split('.').try_fold(self, |node, segment| match node {
            TagValue::Map(map) => map.get(segment),
            TagValue::List(list) => segment.parse::<usize>().ok().and_then(|i| list.get(i)),
            _ => None,
        })
    }

    /// Nesting depth; scalars and empty containers have depth 1.
    pub fn depth(&self) -> usize {
        match self {
            TagValue::List(list) => 1 + list.iter().map(TagValue::depth).max().unwrap_or(0),
            TagValue::Map(map) => 1 + map.values().map(TagValue::depth).max().unwrap_or(0),
            _ => 1,
        }
    }
}

impl PartialEq for TagValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TagValue::Null, TagValue::Null) => true,
            (TagValue::Bool(a), TagValue::Bool(b)) => a == b,
            (TagValue::Int(a), TagValue::Int(b)) => a == b,
            (TagValue::Float(a), TagValue::Float(b)) => a.to_bits() == b.to_bits(),
            (TagValue::String(a), TagValue::String(b)) => a == b,
            (TagValue::List(a), TagValue::List(b)) => a == b,
            // IndexMap equality ignores order, tags do not
            (TagValue::Map(a), TagValue::Map(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|((ka, va), (kb, vb))| ka == kb && va == vb)
            }
            _ => false,
        }
    }
}

impl Default for TagValue {
    fn default() -> Self {
        TagValue::Null
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Null => write!(f, "null"),
            TagValue::Bool(b) => write!(f, "{}", b),
            TagValue::Int(i) => write!(f, "{}", i),
            TagValue::Float(x) => write!(f, "{:?}", x),
            TagValue::String(s) => write!(f, "{:?}", s),
            TagValue::List(list) => {
                write!(f, "[")?;
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            TagValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for TagValue {
    fn from(b: bool) -> Self {
        TagValue::Bool(b)
    }
}

impl From<i64> for TagValue {
    fn from(i: i64) -> Self {
        TagValue::Int(i)
    }
}

impl From<i32> for TagValue {
    fn from(i: i32) -> Self {
        TagValue::Int(i64::from(i))
    }
}

impl From<f64> for TagValue {
    fn from(x: f64) -> Self {
        TagValue::Float(x)
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        TagValue::String(s.to_string())
    }
}

impl From<String> for TagValue {
    fn from(s: String) -> Self {
        TagValue::String(s)
    }
}

impl From<Vec<TagValue>> for TagValue {
    fn from(list: Vec<TagValue>) -> Self {
        TagValue::List(list)
    }
}

impl From<TagMap> for TagValue {
    fn from(map: TagMap) -> Self {
        TagValue::Map(map)
    }
}

impl<T: Into<TagValue>> From<Option<T>> for TagValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(TagValue::Null, Into::into)
    }
}
