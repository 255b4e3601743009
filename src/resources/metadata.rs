//
//  devops-state
//  resources/metadata.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Field metadata for resource types.
//!
//! Each resource type declares a static [`ResourceDescriptor`]: its fields,
//! which one is the identifier, which are editable, and the wire name of
//! each field when it differs from the local name. Descriptors are validated
//! once when the global [`Registry`] is first used.
//!
//! ```rust
//! use devops_state::resources::{FieldSpec, ResourceDescriptor, ResourceKind};
//!
//! static DESCRIPTOR: ResourceDescriptor = ResourceDescriptor {
//!     kind: ResourceKind::Repository,
//!     fields: &[
//!         FieldSpec::identifier("id"),
//!         FieldSpec::editable("name"),
//!         FieldSpec::editable("default_branch").wire("defaultBranch"),
//!     ],
//! };
//!
//! let metadata = DESCRIPTOR.validate().unwrap();
//! assert_eq!(metadata.id_field(), "id");
//! assert_eq!(metadata.editable().wire_name("default_branch"), Some("defaultBranch"));
//! ```

use std::collections::BTreeMap;

use once_cell::sync::OnceCell;
use thiserror::Error;

use super::ResourceKind;

/// Errors in a resource type's metadata. These are programming errors in a
/// resource implementation and surface on first use of the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("{type_name} declares no identifier field")]
    MissingIdentifier { type_name: &'static str },

    #[error("{type_name} declares several identifier fields: {}", .fields.join(", "))]
    MultipleIdentifiers {
        type_name: &'static str,
        fields: Vec<&'static str>,
    },

    #[error("{type_name} declares field '{field}' twice")]
    DuplicateField {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("{type_name} maps two editable fields to wire name '{wire_name}'")]
    DuplicateWireName {
        type_name: &'static str,
        wire_name: &'static str,
    },

    #[error("{type_name} is registered twice")]
    DuplicateType { type_name: &'static str },

    #[error("{type_name} is not registered")]
    Unregistered { type_name: &'static str },
}

/// Declaration of a single resource field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Name used in code and in the state file.
    pub local_name: &'static str,
    /// Name used by the remote protocol, when different.
    pub wire_name: Option<&'static str>,
    /// Whether this field identifies the resource.
    pub identifier: bool,
    /// Whether this field can be changed through `update`.
    pub editable: bool,
}

impl FieldSpec {
    /// A plain, read-only field.
    pub const fn field(local_name: &'static str) -> Self {
        Self {
            local_name,
            wire_name: None,
            identifier: false,
            editable: false,
        }
    }

    /// The identifier field.
    pub const fn identifier(local_name: &'static str) -> Self {
        Self {
            identifier: true,
            ..Self::field(local_name)
        }
    }

    /// An editable field.
    pub const fn editable(local_name: &'static str) -> Self {
        Self {
            editable: true,
            ..Self::field(local_name)
        }
    }

    /// Sets a wire name distinct from the local name.
    pub const fn wire(self, wire_name: &'static str) -> Self {
        Self {
            wire_name: Some(wire_name),
            ..self
        }
    }

    /// The name used on the wire.
    pub fn wire_name(&self) -> &'static str {
        self.wire_name.unwrap_or(self.local_name)
    }
}

/// Static metadata table of one resource type.
#[derive(Debug)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub fields: &'static [FieldSpec],
}

impl ResourceDescriptor {
    /// Checks the table and builds the lookup form.
    ///
    /// # Errors
    ///
    /// - [`MetadataError::MissingIdentifier`] / [`MetadataError::MultipleIdentifiers`]
    ///   unless exactly one field is the identifier
    /// - [`MetadataError::DuplicateField`] if a local name repeats
    /// - [`MetadataError::DuplicateWireName`] if two editable fields share a wire name
    pub fn validate(&self) -> Result<TypeMetadata, MetadataError> {
        let type_name = self.kind.type_name();

        for (index, field) in self.fields.iter().enumerate() {
            if self.fields[..index]
                .iter()
                .any(|f| f.local_name == field.local_name)
            {
                return Err(MetadataError::DuplicateField {
                    type_name,
                    field: field.local_name,
                });
            }
        }

        let identifiers: Vec<&'static str> = self
            .fields
            .iter()
            .filter(|f| f.identifier)
            .map(|f| f.local_name)
            .collect();
        let id_field = match identifiers.as_slice() {
            [] => return Err(MetadataError::MissingIdentifier { type_name }),
            [single] => *single,
            _ => {
                return Err(MetadataError::MultipleIdentifiers {
                    type_name,
                    fields: identifiers,
                })
            }
        };

        let mut editable = EditableFields::default();
        for field in self.fields.iter().filter(|f| f.editable) {
            let wire_name = field.wire_name();
            if editable.local_by_wire.contains_key(wire_name) {
                return Err(MetadataError::DuplicateWireName {
                    type_name,
                    wire_name,
                });
            }
            editable.order.push(field.local_name);
            editable.wire_by_local.insert(field.local_name, wire_name);
            editable.local_by_wire.insert(wire_name, field.local_name);
        }

        Ok(TypeMetadata {
            kind: self.kind,
            id_field,
            editable,
        })
    }
}

/// Bidirectional local <-> wire name mapping of a type's editable fields.
#[derive(Debug, Clone, Default)]
pub struct EditableFields {
    order: Vec<&'static str>,
    wire_by_local: BTreeMap<&'static str, &'static str>,
    local_by_wire: BTreeMap<&'static str, &'static str>,
}

impl EditableFields {
    /// Returns `true` if `local_name` is editable.
    pub fn is_editable(&self, local_name: &str) -> bool {
        self.wire_by_local.contains_key(local_name)
    }

    /// Wire name of an editable field, by local name.
    pub fn wire_name(&self, local_name: &str) -> Option<&'static str> {
        self.wire_by_local.get(local_name).copied()
    }

    /// Local name of an editable field, accepting either its local or its wire name.
    pub fn local_name(&self, name: &str) -> Option<&'static str> {
        self.wire_by_local
            .get_key_value(name)
            .map(|(local, _)| *local)
            .or_else(|| self.local_by_wire.get(name).copied())
    }

    /// Editable local names, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Validated metadata of one resource type.
#[derive(Debug, Clone)]
pub struct TypeMetadata {
    kind: ResourceKind,
    id_field: &'static str,
    editable: EditableFields,
}

impl TypeMetadata {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Local name of the identifier field.
    pub fn id_field(&self) -> &'static str {
        self.id_field
    }

    pub fn editable(&self) -> &EditableFields {
        &self.editable
    }
}

/// Validated metadata of every registered resource type.
#[derive(Debug)]
pub struct Registry {
    types: BTreeMap<ResourceKind, TypeMetadata>,
}

static GLOBAL: OnceCell<Registry> = OnceCell::new();

impl Registry {
    /// Validates a set of descriptors into a registry.
    pub fn build(descriptors: &[&ResourceDescriptor]) -> Result<Self, MetadataError> {
        let mut types = BTreeMap::new();
        for descriptor in descriptors {
            let metadata = descriptor.validate()?;
            if types.insert(descriptor.kind, metadata).is_some() {
                return Err(MetadataError::DuplicateType {
                    type_name: descriptor.kind.type_name(),
                });
            }
        }
        Ok(Self { types })
    }

    /// The registry of every [`ResourceKind`], built and validated on first use.
    ///
    /// A metadata error is returned on every call until fixed; nothing is cached
    /// on failure.
    pub fn global() -> Result<&'static Registry, MetadataError> {
        GLOBAL.get_or_try_init(|| {
            let descriptors: Vec<&ResourceDescriptor> =
                ResourceKind::ALL.iter().map(|k| k.descriptor()).collect();
            Self::build(&descriptors)
        })
    }

    /// Metadata of one type.
    pub fn metadata(&self, kind: ResourceKind) -> Result<&TypeMetadata, MetadataError> {
        self.types.get(&kind).ok_or(MetadataError::Unregistered {
            type_name: kind.type_name(),
        })
    }

    /// Local name of a type's identifier field.
    pub fn id_field(&self, kind: ResourceKind) -> Result<&'static str, MetadataError> {
        self.metadata(kind).map(TypeMetadata::id_field)
    }

    /// Editable fields of a type.
    pub fn editable_fields(&self, kind: ResourceKind) -> Result<&EditableFields, MetadataError> {
        self.metadata(kind).map(TypeMetadata::editable)
    }
}
