//! Conversions between [`TagValue`] and `serde_json::Value`.
//!
//! JSON to tag keeps structure and key order. Numbers that fit `i64` become
//! integers; the rest become floats, so unsigned values above `i64::MAX`
//! lose precision. Tag to JSON maps non-finite floats, which JSON cannot
//! represent, to `null`.
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::tag::value::{TagMap, TagValue};

impl From<JsonValue> for TagValue {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => TagValue::Null,
            JsonValue::Bool(b) => TagValue::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => TagValue::Int(i),
                None => TagValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => TagValue::String(s),
            JsonValue::Array(items) => TagValue::List(items.into_iter().map(TagValue::from).collect()),
            JsonValue::Object(entries) => {
                let map: TagMap = entries.into_iter().map(|(k, v)| (k, TagValue::from(v))).collect();
                TagValue::Map(map)
            }
        }
    }
}

impl From<&TagValue> for JsonValue {
    fn from(tag: &TagValue) -> Self {
        match tag {
            TagValue::Null => JsonValue::Null,
            TagValue::Bool(b) => JsonValue::Bool(*b),
            TagValue::Int(i) => JsonValue::Number(Number::from(*i)),
            TagValue::Float(x) => Number::from_f64(*x).map_or(JsonValue::Null, JsonValue::Number),
            TagValue::String(s) => JsonValue::String(s.clone()),
            TagValue::List(items) => JsonValue::Array(items.iter().map(JsonValue::from).collect()),
            TagValue::Map(map) => {
                let object: JsonMap<String, JsonValue> =
                    map.iter().map(|(k, v)| (k.clone(), JsonValue::from(v))).collect();
                JsonValue::Object(object)
            }
        }
    }
}
