//
//  devops-state
//  codec/value.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Attribute values and the ordered attribute list every resource exposes.
//!
//! Resources describe themselves to the codec as an [`Attributes`] list of
//! `(local name, AttrValue)` pairs. The codec never inspects resource structs
//! directly, so adding a resource type only requires implementing
//! `attributes()` and `from_attributes()`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::CodecError;
use crate::resources::{AnyResource, Resource};

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Text.
    Str(String),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Absent optional value.
    Null,
    /// Timestamp in UTC.
    DateTime(DateTime<Utc>),
    /// String-keyed mapping of values.
    Map(BTreeMap<String, AttrValue>),
    /// Sequence of values.
    List(Vec<AttrValue>),
    /// A nested resource, owned by value.
    Resource(Box<AnyResource>),
}

impl AttrValue {
    /// Short name of the value's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Null => "none",
            Self::DateTime(_) => "datetime",
            Self::Map(_) => "map",
            Self::List(_) => "list",
            Self::Resource(_) => "resource",
        }
    }

    /// Wraps an optional value, mapping `None` to [`AttrValue::Null`].
    pub fn optional<T: Into<AttrValue>>(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }

    /// Wraps a resource.
    pub fn resource<R: Resource>(resource: R) -> Self {
        Self::Resource(Box::new(resource.into_any()))
    }

    /// Returns the text if this is a [`AttrValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Renders scalar values as the identifier text used for state keys.
    pub fn as_id(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Int(i) => Some(i.to_string()),
            _ => None,
        }
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for AttrValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values.into_iter().map(Self::Str).collect())
    }
}

impl From<BTreeMap<String, AttrValue>> for AttrValue {
    fn from(value: BTreeMap<String, AttrValue>) -> Self {
        Self::Map(value)
    }
}

/// Ordered list of a resource's attributes.
///
/// Order is preserved from construction through encoding, so the state file
/// lists fields in the order the resource declares them.
///
/// The `take_*` accessors remove an attribute and convert it, failing with a
/// [`CodecError`] that names the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    /// Creates an empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Attributes::insert`].
    pub fn with(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn insert(&mut self, name: &str, value: impl Into<AttrValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Returns an attribute by local name.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Iterates over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes an attribute, failing if it is absent.
    pub fn take(&mut self, name: &str) -> Result<AttrValue, CodecError> {
        let index = self
            .entries
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| CodecError::missing(name))?;
        Ok(self.entries.remove(index).1)
    }

    /// Removes an attribute if present; absent and `Null` both yield `None`.
    pub fn take_optional(&mut self, name: &str) -> Option<AttrValue> {
        match self.take(name) {
            Ok(AttrValue::Null) | Err(_) => None,
            Ok(value) => Some(value),
        }
    }

    pub fn take_string(&mut self, name: &str) -> Result<String, CodecError> {
        expect_string(name, self.take(name)?)
    }

    pub fn take_opt_string(&mut self, name: &str) -> Result<Option<String>, CodecError> {
        self.take_optional(name)
            .map(|v| expect_string(name, v))
            .transpose()
    }

    pub fn take_i64(&mut self, name: &str) -> Result<i64, CodecError> {
        match self.take(name)? {
            AttrValue::Int(i) => Ok(i),
            other => Err(CodecError::mismatch(name, "int", other.kind_name())),
        }
    }

    pub fn take_bool(&mut self, name: &str) -> Result<bool, CodecError> {
        expect_bool(name, self.take(name)?)
    }

    pub fn take_opt_bool(&mut self, name: &str) -> Result<Option<bool>, CodecError> {
        self.take_optional(name)
            .map(|v| expect_bool(name, v))
            .transpose()
    }

    pub fn take_datetime(&mut self, name: &str) -> Result<DateTime<Utc>, CodecError> {
        match self.take(name)? {
            AttrValue::DateTime(dt) => Ok(dt),
            other => Err(CodecError::mismatch(name, "datetime", other.kind_name())),
        }
    }

    pub fn take_opt_datetime(&mut self, name: &str) -> Result<Option<DateTime<Utc>>, CodecError> {
        match self.take_optional(name) {
            None => Ok(None),
            Some(AttrValue::DateTime(dt)) => Ok(Some(dt)),
            Some(other) => Err(CodecError::mismatch(name, "datetime", other.kind_name())),
        }
    }

    /// Removes a list of strings; an absent list is empty.
    pub fn take_string_list(&mut self, name: &str) -> Result<Vec<String>, CodecError> {
        match self.take_optional(name) {
            None => Ok(Vec::new()),
            Some(AttrValue::List(items)) => items
                .into_iter()
                .map(|item| expect_string(name, item))
                .collect(),
            Some(other) => Err(CodecError::mismatch(name, "list", other.kind_name())),
        }
    }

    /// Removes a mapping; an absent mapping is empty.
    pub fn take_map(&mut self, name: &str) -> Result<BTreeMap<String, AttrValue>, CodecError> {
        match self.take_optional(name) {
            None => Ok(BTreeMap::new()),
            Some(AttrValue::Map(map)) => Ok(map),
            Some(other) => Err(CodecError::mismatch(name, "map", other.kind_name())),
        }
    }

    /// Removes a nested resource of type `R`.
    pub fn take_resource<R: Resource>(&mut self, name: &str) -> Result<R, CodecError> {
        expect_resource(name, self.take(name)?)
    }

    pub fn take_opt_resource<R: Resource>(&mut self, name: &str) -> Result<Option<R>, CodecError> {
        self.take_optional(name)
            .map(|v| expect_resource(name, v))
            .transpose()
    }
}

impl IntoIterator for Attributes {
    type Item = (String, AttrValue);
    type IntoIter = std::vec::IntoIter<(String, AttrValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Converts a value to a `String` or reports a mismatch on `field`.
pub fn expect_string(field: &str, value: AttrValue) -> Result<String, CodecError> {
    match value {
        AttrValue::Str(s) => Ok(s),
        other => Err(CodecError::mismatch(field, "string", other.kind_name())),
    }
}

/// Converts a value to a `bool` or reports a mismatch on `field`.
pub fn expect_bool(field: &str, value: AttrValue) -> Result<bool, CodecError> {
    match value {
        AttrValue::Bool(b) => Ok(b),
        other => Err(CodecError::mismatch(field, "bool", other.kind_name())),
    }
}

fn expect_resource<R: Resource>(field: &str, value: AttrValue) -> Result<R, CodecError> {
    match value {
        AttrValue::Resource(any) => {
            let found = any.kind().type_name();
            R::from_any(*any).ok_or_else(|| CodecError::UnexpectedResource {
                field: field.to_string(),
                expected: R::kind().type_name(),
                found,
            })
        }
        other => Err(CodecError::mismatch(field, "resource", other.kind_name())),
    }
}
