//
//  devops-state
//  codec/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # State Codec
//!
//! Converts resources to the flat, JSON-safe objects stored in the state file
//! and back, without any external schema.
//!
//! ## Encoding Rules
//!
//! Each attribute becomes one JSON entry. Anything that is not plain text
//! carries its kind in a `::` suffix on the key:
//!
//! | Attribute | Key | Value |
//! |-----------|-----|-------|
//! | text | `name` | `"web"` |
//! | integer | `size::int` | `"42"` |
//! | float | `ratio::float` | `"0.5"` |
//! | boolean | `is_draft::bool` | `"true"` |
//! | absent | `description::none` | `null` |
//! | timestamp | `creation_date::datetime` | `"2025-01-02T03:04:05Z"` |
//! | nested resource | `created_by::User` | encoded object |
//! | mapping | `variables` | object, entries tagged the same way |
//! | sequence | `tags` | array; text bare, anything else as `{"item<tag>": value}` |
//!
//! Untagged text is always text, so a string such as `"True"` or `"None"`
//! survives a round trip unchanged.
//!
//! A name that itself contains `::` (a variable called `DB::none`, say) always
//! gets an explicit tag, with `::str`, `::map` and `::list` for the kinds that
//! are otherwise untagged. Only the last suffix is ever read as a tag, so the
//! name comes back verbatim: `DB::none` holding text is stored as
//! `DB::none::str`.
//!
//! ## Example
//!
//! ```json
//! {
//!     "pull_request_id::int": "17",
//!     "title": "Add login page",
//!     "created_by::User": {"descriptor": "aad.abc", "display_name": "Ana"},
//!     "creation_date::datetime": "2025-01-02T03:04:05Z",
//!     "is_draft::bool": "false"
//! }
//! ```

mod error;
mod value;

pub use error::CodecError;
pub use value::{expect_bool, expect_string, AttrValue, Attributes};

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::resources::{AnyResource, Resource, ResourceKind};

/// Separator between an attribute name and its tag.
pub const TAG_SEPARATOR: &str = "::";

/// Key used for tagged sequence elements.
pub const ITEM_KEY: &str = "item";

/// The kind recorded in a key suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Int,
    Float,
    Bool,
    None,
    DateTime,
    /// Text under a name that contains the separator.
    Str,
    /// Mapping under a name that contains the separator.
    Map,
    /// Sequence under a name that contains the separator.
    List,
    /// A nested resource of the given type.
    Resource(ResourceKind),
}

impl Tag {
    /// The suffix text, without the separator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::None => "none",
            Self::DateTime => "datetime",
            Self::Str => "str",
            Self::Map => "map",
            Self::List => "list",
            Self::Resource(kind) => kind.type_name(),
        }
    }

    /// Parses a suffix. Unknown suffixes are not tags.
    pub fn parse(suffix: &str) -> Option<Self> {
        match suffix {
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            "none" => Some(Self::None),
            "datetime" => Some(Self::DateTime),
            "str" => Some(Self::Str),
            "map" => Some(Self::Map),
            "list" => Some(Self::List),
            other => ResourceKind::from_type_name(other).map(Self::Resource),
        }
    }
}

/// Splits an encoded key into its base name and tag.
///
/// Only a recognised suffix after the last `::` counts as a tag; a key such
/// as `"a::b"` is returned whole.
pub fn split_key(key: &str) -> (&str, Option<Tag>) {
    match key.rsplit_once(TAG_SEPARATOR) {
        Some((base, suffix)) => match Tag::parse(suffix) {
            Some(tag) => (base, Some(tag)),
            None => (key, None),
        },
        None => (key, None),
    }
}

fn tagged(name: &str, tag: Tag) -> String {
    format!("{}{}{}", name, TAG_SEPARATOR, tag.as_str())
}

/// Key for a kind that is normally untagged.
fn plain(name: &str, tag: Tag) -> String {
    if name.contains(TAG_SEPARATOR) {
        tagged(name, tag)
    } else {
        name.to_string()
    }
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Encodes a resource into its state form.
pub fn encode<R: Resource>(resource: &R) -> Map<String, Value> {
    encode_attributes(&resource.attributes())
}

/// Encodes an attribute list into a JSON object.
pub fn encode_attributes(attributes: &Attributes) -> Map<String, Value> {
    attributes
        .iter()
        .map(|(name, value)| encode_entry(name, value))
        .collect()
}

/// Encodes a single named attribute into a `(key, value)` pair.
pub fn encode_entry(name: &str, value: &AttrValue) -> (String, Value) {
    match value {
        AttrValue::Str(s) => (plain(name, Tag::Str), Value::String(s.clone())),
        AttrValue::Int(i) => (tagged(name, Tag::Int), Value::String(i.to_string())),
        AttrValue::Float(f) => (tagged(name, Tag::Float), Value::String(f.to_string())),
        AttrValue::Bool(b) => (tagged(name, Tag::Bool), Value::String(b.to_string())),
        AttrValue::Null => (tagged(name, Tag::None), Value::Null),
        AttrValue::DateTime(dt) => (tagged(name, Tag::DateTime), Value::String(format_datetime(dt))),
        AttrValue::Map(entries) => (
            plain(name, Tag::Map),
            Value::Object(entries.iter().map(|(k, v)| encode_entry(k, v)).collect()),
        ),
        AttrValue::List(items) => (
            plain(name, Tag::List),
            Value::Array(items.iter().map(encode_item).collect()),
        ),
        AttrValue::Resource(resource) => (
            tagged(name, Tag::Resource(resource.kind())),
            Value::Object(resource.to_state()),
        ),
    }
}

fn encode_item(value: &AttrValue) -> Value {
    match value {
        AttrValue::Str(s) => Value::String(s.clone()),
        AttrValue::List(items) => Value::Array(items.iter().map(encode_item).collect()),
        other => {
            let (key, encoded) = encode_entry(ITEM_KEY, other);
            let mut wrapper = Map::new();
            wrapper.insert(key, encoded);
            Value::Object(wrapper)
        }
    }
}

/// Decodes a state object into a resource of type `R`.
pub fn decode<R: Resource>(map: &Map<String, Value>) -> Result<R, CodecError> {
    R::from_attributes(decode_attributes(map)?)
}

/// Decodes a state object into a resource of the given kind.
pub fn decode_any(kind: ResourceKind, map: &Map<String, Value>) -> Result<AnyResource, CodecError> {
    kind.decode_state(map)
}

/// Decodes a JSON object into an attribute list, keyed by base name.
pub fn decode_attributes(map: &Map<String, Value>) -> Result<Attributes, CodecError> {
    let mut attributes = Attributes::new();
    for (key, value) in map {
        let (name, decoded) = decode_entry(key, value)?;
        attributes.insert(&name, decoded);
    }
    Ok(attributes)
}

/// Decodes one encoded entry into its base name and value.
pub fn decode_entry(key: &str, value: &Value) -> Result<(String, AttrValue), CodecError> {
    let (base, tag) = split_key(key);
    let decoded = match tag {
        None => decode_untagged(key, value)?,
        Some(tag) => decode_tagged(key, tag, value)?,
    };
    Ok((base.to_string(), decoded))
}

fn decode_untagged(key: &str, value: &Value) -> Result<AttrValue, CodecError> {
    Ok(match value {
        Value::String(s) => AttrValue::Str(s.clone()),
        Value::Object(entries) => {
            let mut map = BTreeMap::new();
            for (k, v) in entries {
                let (name, decoded) = decode_entry(k, v)?;
                map.insert(name, decoded);
            }
            AttrValue::Map(map)
        }
        Value::Array(items) => AttrValue::List(
            items
                .iter()
                .map(|item| decode_item(key, item))
                .collect::<Result<_, _>>()?,
        ),
        // Hand-edited files may carry native JSON scalars.
        Value::Null => AttrValue::Null,
        Value::Bool(b) => AttrValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => AttrValue::Int(i),
            None => AttrValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
    })
}

fn decode_tagged(key: &str, tag: Tag, value: &Value) -> Result<AttrValue, CodecError> {
    let invalid = || CodecError::InvalidValue {
        field: key.to_string(),
        tag: tag.as_str().to_string(),
        value: value.to_string(),
    };

    match tag {
        Tag::None => Ok(AttrValue::Null),
        Tag::Int => match value {
            Value::Number(n) => n.as_i64().map(AttrValue::Int).ok_or_else(invalid),
            Value::String(s) => s.trim().parse().map(AttrValue::Int).map_err(|_| invalid()),
            _ => Err(invalid()),
        },
        Tag::Float => match value {
            Value::Number(n) => n.as_f64().map(AttrValue::Float).ok_or_else(invalid),
            Value::String(s) => s.trim().parse().map(AttrValue::Float).map_err(|_| invalid()),
            _ => Err(invalid()),
        },
        Tag::Bool => match value {
            Value::Bool(b) => Ok(AttrValue::Bool(*b)),
            Value::String(s) => match s.as_str() {
                "true" | "True" => Ok(AttrValue::Bool(true)),
                "false" | "False" => Ok(AttrValue::Bool(false)),
                _ => Err(invalid()),
            },
            _ => Err(invalid()),
        },
        Tag::DateTime => match value {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| AttrValue::DateTime(dt.with_timezone(&Utc)))
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        },
        Tag::Str => match value {
            Value::String(s) => Ok(AttrValue::Str(s.clone())),
            _ => Err(invalid()),
        },
        Tag::Map | Tag::List => match (tag, value) {
            (Tag::Map, Value::Object(_)) | (Tag::List, Value::Array(_)) => decode_untagged(key, value),
            _ => Err(invalid()),
        },
        Tag::Resource(kind) => match value {
            Value::Object(entries) => Ok(AttrValue::Resource(Box::new(decode_any(kind, entries)?))),
            _ => Err(invalid()),
        },
    }
}

fn decode_item(key: &str, item: &Value) -> Result<AttrValue, CodecError> {
    match item {
        Value::String(s) => Ok(AttrValue::Str(s.clone())),
        Value::Array(items) => Ok(AttrValue::List(
            items
                .iter()
                .map(|inner| decode_item(key, inner))
                .collect::<Result<_, _>>()?,
        )),
        Value::Object(wrapper) if wrapper.len() == 1 => {
            let Some((item_key, item_value)) = wrapper.iter().next() else {
                return Err(CodecError::MalformedItem {
                    field: key.to_string(),
                });
            };
            let (base, _) = split_key(item_key);
            if base != ITEM_KEY {
                return Err(CodecError::MalformedItem {
                    field: key.to_string(),
                });
            }
            decode_entry(item_key, item_value).map(|(_, value)| value)
        }
        _ => Err(CodecError::MalformedItem {
            field: key.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn roundtrip(attrs: Attributes) -> Attributes {
        decode_attributes(&encode_attributes(&attrs)).unwrap()
    }

    #[test]
    fn test_scalar_tags() {
        let attrs = Attributes::new()
            .with("name", "web")
            .with("size", 42i64)
            .with("ratio", 0.5f64)
            .with("is_draft", false)
            .with("description", AttrValue::Null);

        let encoded = encode_attributes(&attrs);
        assert_eq!(
            Value::Object(encoded.clone()),
            json!({
                "name": "web",
                "size::int": "42",
                "ratio::float": "0.5",
                "is_draft::bool": "false",
                "description::none": null
            })
        );
        assert_eq!(decode_attributes(&encoded).unwrap(), attrs);
    }

    #[test]
    fn test_literal_strings_stay_strings() {
        let attrs = Attributes::new()
            .with("a", "True")
            .with("b", "False")
            .with("c", "None")
            .with("d", "42");
        assert_eq!(roundtrip(attrs.clone()), attrs);
    }

    #[test]
    fn test_datetime_roundtrip() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        let attrs = Attributes::new().with("queued", dt);
        let encoded = encode_attributes(&attrs);
        assert_eq!(encoded["queued::datetime"], json!("2025-03-04T05:06:07Z"));
        assert_eq!(decode_attributes(&encoded).unwrap(), attrs);
    }

    #[test]
    fn test_nested_map_and_list() {
        let mut inner = BTreeMap::new();
        inner.insert("value".to_string(), AttrValue::Str("x".into()));
        inner.insert("is_secret".to_string(), AttrValue::Bool(true));
        let mut outer = BTreeMap::new();
        outer.insert("TOKEN".to_string(), AttrValue::Map(inner));

        let attrs = Attributes::new()
            .with("variables", AttrValue::Map(outer))
            .with(
                "mixed",
                AttrValue::List(vec![
                    AttrValue::Str("a".into()),
                    AttrValue::Int(3),
                    AttrValue::Null,
                    AttrValue::List(vec![AttrValue::Bool(true)]),
                ]),
            );

        let encoded = encode_attributes(&attrs);
        assert_eq!(
            encoded["variables"],
            json!({"TOKEN": {"is_secret::bool": "true", "value": "x"}})
        );
        assert_eq!(
            encoded["mixed"],
            json!(["a", {"item::int": "3"}, {"item::none": null}, [{"item::bool": "true"}]])
        );
        assert_eq!(decode_attributes(&encoded).unwrap(), attrs);
    }

    #[test]
    fn test_map_keys_ending_in_a_tag_roundtrip() {
        let suffixes = [
            "int", "float", "bool", "none", "datetime", "str", "map", "list", "User", "Build",
        ];
        let mut labels = BTreeMap::new();
        for suffix in suffixes {
            labels.insert(format!("build::{}", suffix), AttrValue::Str("fast".into()));
            labels.insert(format!("n::{}", suffix), AttrValue::Int(7));
            labels.insert(format!("gone::{}", suffix), AttrValue::Null);
            labels.insert(
                format!("nested::{}", suffix),
                AttrValue::Map(BTreeMap::from([("k::int".to_string(), AttrValue::Bool(true))])),
            );
            labels.insert(
                format!("seq::{}", suffix),
                AttrValue::List(vec![AttrValue::Str("a".into()), AttrValue::Int(1)]),
            );
        }
        labels.insert("odd::".to_string(), AttrValue::Str("x".into()));
        labels.insert("::".to_string(), AttrValue::Str("y".into()));

        let attrs = Attributes::new().with("labels", AttrValue::Map(labels));
        let encoded = encode_attributes(&attrs);
        assert_eq!(encoded["labels"]["build::int::str"], json!("fast"));
        assert_eq!(encoded["labels"]["gone::none::none"], json!(null));
        assert_eq!(decode_attributes(&encoded).unwrap(), attrs);
    }

    #[test]
    fn test_plain_keys_keep_their_format() {
        let legacy = json!({"labels": {"a::b": "x", "TOKEN": {"value": "v"}}});
        let attrs = decode_attributes(legacy.as_object().unwrap()).unwrap();
        let Some(AttrValue::Map(labels)) = attrs.get("labels") else {
            panic!("labels should decode to a map");
        };
        assert_eq!(labels.get("a::b"), Some(&AttrValue::Str("x".into())));
        assert_eq!(Value::Object(encode_attributes(&attrs))["labels"]["TOKEN"], json!({"value": "v"}));
    }

    #[test]
    fn test_explicit_tag_with_wrong_value_is_rejected() {
        let bad = json!({"a::b::map": "text"});
        assert!(matches!(
            decode_attributes(bad.as_object().unwrap()),
            Err(CodecError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_split_key() {
        assert_eq!(split_key("size::int"), ("size", Some(Tag::Int)));
        assert_eq!(
            split_key("created_by::User"),
            ("created_by", Some(Tag::Resource(ResourceKind::User)))
        );
        assert_eq!(split_key("a::b"), ("a::b", None));
        assert_eq!(split_key("DB::none::str"), ("DB::none", Some(Tag::Str)));
        assert_eq!(split_key("plain"), ("plain", None));
    }

    #[test]
    fn test_invalid_tagged_values() {
        let bad = json!({"size::int": "many"});
        assert!(matches!(
            decode_attributes(bad.as_object().unwrap()),
            Err(CodecError::InvalidValue { .. })
        ));

        let bad = json!({"tags": [{"other": "x"}]});
        assert!(matches!(
            decode_attributes(bad.as_object().unwrap()),
            Err(CodecError::MalformedItem { .. })
        ));
    }

    #[test]
    fn test_legacy_capitalised_booleans() {
        let legacy = json!({"flag::bool": "True"});
        let attrs = decode_attributes(legacy.as_object().unwrap()).unwrap();
        assert_eq!(attrs.get("flag"), Some(&AttrValue::Bool(true)));
    }
}
