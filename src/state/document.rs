//
//  devops-state
//  state/document.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! The in-memory form of the state file.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use super::StateError;
use crate::resources::ResourceKind;

/// Schema version written to, and required in, every state file.
pub const STATE_VERSION: u32 = 1;

/// A stored resource in its encoded state form.
pub type StateEntry = Map<String, Value>;

static NO_ENTRIES: BTreeMap<String, StateEntry> = BTreeMap::new();

/// Identifies one state entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntryKey {
    pub kind: ResourceKind,
    pub id: String,
}

impl EntryKey {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Versioned mapping of resource type to id to entry.
///
/// Every [`ResourceKind`] always has a mapping, possibly empty.
#[derive(Debug, Clone, PartialEq)]
pub struct StateDocument {
    version: u32,
    resources: BTreeMap<ResourceKind, BTreeMap<String, StateEntry>>,
}

impl Default for StateDocument {
    fn default() -> Self {
        Self::empty()
    }
}

impl StateDocument {
    /// The current-version document with no entries.
    pub fn empty() -> Self {
        Self {
            version: STATE_VERSION,
            resources: ResourceKind::ALL
                .into_iter()
                .map(|kind| (kind, BTreeMap::new()))
                .collect(),
        }
    }

    /// Parses the contents of the state file at `path`.
    ///
    /// # Errors
    ///
    /// - [`StateError::Corrupt`] if the text is not JSON, is not shaped like a
    ///   state document, or names an unknown resource type
    /// - [`StateError::VersionMismatch`] if the version is missing or not
    ///   [`STATE_VERSION`]
    pub fn parse(path: &Path, text: &str) -> Result<Self, StateError> {
        let corrupt = |reason: String| StateError::Corrupt {
            path: path.to_path_buf(),
            reason,
        };

        let root = match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(root)) => root,
            Ok(_) => return Err(corrupt("expected a JSON object".into())),
            Err(e) => return Err(corrupt(e.to_string())),
        };

        let found = match root.get("version") {
            None => None,
            Some(v) => Some(
                v.as_u64()
                    .ok_or_else(|| corrupt(format!("version must be an integer, found {}", v)))?,
            ),
        };
        if found != Some(u64::from(STATE_VERSION)) {
            return Err(StateError::VersionMismatch {
                path: path.to_path_buf(),
                found,
                expected: STATE_VERSION,
            });
        }

        let mut document = Self::empty();
        let types = match root.get("resources") {
            None | Some(Value::Null) => return Ok(document),
            Some(Value::Object(types)) => types,
            Some(_) => return Err(corrupt("'resources' must be an object".into())),
        };

        for (type_name, entries) in types {
            let kind = ResourceKind::from_type_name(type_name)
                .ok_or_else(|| corrupt(format!("unknown resource type '{}'", type_name)))?;
            let Value::Object(entries) = entries else {
                return Err(corrupt(format!("entries of {} must be an object", type_name)));
            };

            let slot = document.resources.entry(kind).or_default();
            for (id, entry) in entries {
                let Value::Object(entry) = entry else {
                    return Err(corrupt(format!("entry {}/{} must be an object", type_name, id)));
                };
                slot.insert(id.clone(), entry.clone());
            }
        }

        Ok(document)
    }

    /// Renders the document as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        let resources: Map<String, Value> = self
            .resources
            .iter()
            .map(|(kind, entries)| {
                let entries: Map<String, Value> = entries
                    .iter()
                    .map(|(id, entry)| (id.clone(), Value::Object(entry.clone())))
                    .collect();
                (kind.type_name().to_string(), Value::Object(entries))
            })
            .collect();

        let mut root = Map::new();
        root.insert("version".into(), Value::from(self.version));
        root.insert("resources".into(), Value::Object(resources));
        serde_json::to_string_pretty(&Value::Object(root))
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn get(&self, kind: ResourceKind, id: &str) -> Option<&StateEntry> {
        self.resources.get(&kind).and_then(|entries| entries.get(id))
    }

    pub fn contains(&self, kind: ResourceKind, id: &str) -> bool {
        self.get(kind, id).is_some()
    }

    /// Entries of one type, by id.
    pub fn entries(&self, kind: ResourceKind) -> &BTreeMap<String, StateEntry> {
        self.resources.get(&kind).unwrap_or(&NO_ENTRIES)
    }

    /// Inserts or replaces an entry, returning the previous one.
    pub fn insert(&mut self, kind: ResourceKind, id: &str, entry: StateEntry) -> Option<StateEntry> {
        self.resources
            .entry(kind)
            .or_default()
            .insert(id.to_string(), entry)
    }

    pub fn remove(&mut self, kind: ResourceKind, id: &str) -> Option<StateEntry> {
        self.resources.get_mut(&kind).and_then(|entries| entries.remove(id))
    }

    /// All entries, ordered by type then id.
    pub fn iter(&self) -> impl Iterator<Item = (EntryKey, &StateEntry)> {
        self.resources.iter().flat_map(|(kind, entries)| {
            entries
                .iter()
                .map(move |(id, entry)| (EntryKey::new(*kind, id.as_str()), entry))
        })
    }

    /// Keys of all entries, optionally restricted to one type.
    pub fn keys(&self, filter: Option<ResourceKind>) -> Vec<EntryKey> {
        self.iter()
            .map(|(key, _)| key)
            .filter(|key| filter.map_or(true, |kind| key.kind == kind))
            .collect()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.resources.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<StateDocument, StateError> {
        StateDocument::parse(Path::new("state.json"), &value.to_string())
    }

    #[test]
    fn test_empty_document_lists_every_type() {
        let text = StateDocument::empty().to_json_pretty().unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], json!(1));
        for kind in ResourceKind::ALL {
            assert_eq!(value["resources"][kind.type_name()], json!({}));
        }
    }

    #[test]
    fn test_parse_fills_missing_types() {
        let document = parse(json!({
            "version": 1,
            "resources": {"Repository": {"r-1": {"id": "r-1", "name": "web"}}}
        }))
        .unwrap();
        assert_eq!(document.len(), 1);
        assert!(document.entries(ResourceKind::Build).is_empty());
        assert_eq!(
            document.get(ResourceKind::Repository, "r-1").unwrap()["name"],
            json!("web")
        );

        let reparsed =
            StateDocument::parse(Path::new("state.json"), &document.to_json_pretty().unwrap()).unwrap();
        assert_eq!(reparsed, document);
    }

    #[test]
    fn test_version_is_required() {
        assert!(matches!(
            parse(json!({"resources": {}})),
            Err(StateError::VersionMismatch { found: None, .. })
        ));
        assert!(matches!(
            parse(json!({"version": 2, "resources": {}})),
            Err(StateError::VersionMismatch { found: Some(2), expected: 1, .. })
        ));
    }

    #[test]
    fn test_corrupt_documents() {
        let path = Path::new("state.json");
        assert!(matches!(
            StateDocument::parse(path, "{not json"),
            Err(StateError::Corrupt { .. })
        ));
        assert!(matches!(
            parse(json!([1, 2])),
            Err(StateError::Corrupt { .. })
        ));
        assert!(matches!(
            parse(json!({"version": 1, "resources": {"Pipeline": {}}})),
            Err(StateError::Corrupt { .. })
        ));
        assert!(matches!(
            parse(json!({"version": 1, "resources": {"Build": {"1": "x"}}})),
            Err(StateError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_keys_filter() {
        let mut document = StateDocument::empty();
        document.insert(ResourceKind::Repository, "r-1", Map::new());
        document.insert(ResourceKind::Build, "7", Map::new());

        assert_eq!(document.keys(None).len(), 2);
        assert_eq!(
            document.keys(Some(ResourceKind::Build)),
            vec![EntryKey::new(ResourceKind::Build, "7")]
        );
        assert_eq!(EntryKey::new(ResourceKind::Build, "7").to_string(), "Build/7");
    }
}
