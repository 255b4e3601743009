//
//  devops-state
//  resources/registry.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! The closed set of resource types.
//!
//! [`ResourceKind`] names every type the library knows, and [`AnyResource`]
//! holds an instance of any of them. Operations that only know a type by
//! name (decoding a nested resource, walking the state file) dispatch
//! through these two enums instead of looking types up at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Build, PullRequest, Repository, Resource, ResourceDescriptor, User, VariableGroup};
use crate::codec::{self, AttrValue, CodecError};
use crate::session::Session;
use crate::Result;

/// Every resource type the library can track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    Build,
    PullRequest,
    Repository,
    User,
    VariableGroup,
}

impl ResourceKind {
    /// All kinds, in state-file order.
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Build,
        ResourceKind::PullRequest,
        ResourceKind::Repository,
        ResourceKind::User,
        ResourceKind::VariableGroup,
    ];

    /// The type name used in state files and codec tags.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Build => "Build",
            Self::PullRequest => "PullRequest",
            Self::Repository => "Repository",
            Self::User => "User",
            Self::VariableGroup => "VariableGroup",
        }
    }

    /// Looks a kind up by its exact type name.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_name() == name)
    }

    /// The static metadata table of this kind.
    pub fn descriptor(self) -> &'static ResourceDescriptor {
        match self {
            Self::Build => Build::DESCRIPTOR,
            Self::PullRequest => PullRequest::DESCRIPTOR,
            Self::Repository => Repository::DESCRIPTOR,
            Self::User => User::DESCRIPTOR,
            Self::VariableGroup => VariableGroup::DESCRIPTOR,
        }
    }

    /// Decodes a state entry of this kind.
    pub fn decode_state(self, map: &Map<String, Value>) -> Result<AnyResource, CodecError> {
        Ok(match self {
            Self::Build => AnyResource::Build(codec::decode(map)?),
            Self::PullRequest => AnyResource::PullRequest(codec::decode(map)?),
            Self::Repository => AnyResource::Repository(codec::decode(map)?),
            Self::User => AnyResource::User(codec::decode(map)?),
            Self::VariableGroup => AnyResource::VariableGroup(codec::decode(map)?),
        })
    }

    /// Fetches the live resource with this kind and id.
    pub async fn fetch(self, session: &Session, id: &str) -> Result<AnyResource> {
        Ok(match self {
            Self::Build => Build::get_by_id(session, id).await?.into_any(),
            Self::PullRequest => PullRequest::get_by_id(session, id).await?.into_any(),
            Self::Repository => Repository::get_by_id(session, id).await?.into_any(),
            Self::User => User::get_by_id(session, id).await?.into_any(),
            Self::VariableGroup => VariableGroup::get_by_id(session, id).await?.into_any(),
        })
    }

    /// Deletes the remote resource with this kind and id.
    pub async fn delete(self, session: &mut Session, id: &str) -> Result<()> {
        match self {
            Self::Build => Build::delete_by_id(session, id).await,
            Self::PullRequest => PullRequest::delete_by_id(session, id).await,
            Self::Repository => Repository::delete_by_id(session, id).await,
            Self::User => User::delete_by_id(session, id).await,
            Self::VariableGroup => VariableGroup::delete_by_id(session, id).await,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    /// Accepts type names case-insensitively, with or without `-`/`_` separators
    /// (`PullRequest`, `pull-request`, `pull_request`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.type_name().to_ascii_lowercase() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|k| k.type_name()).collect();
                format!("unknown resource type '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// An instance of any resource type.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyResource {
    Build(Build),
    PullRequest(PullRequest),
    Repository(Repository),
    User(User),
    VariableGroup(VariableGroup),
}

impl AnyResource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Build(_) => ResourceKind::Build,
            Self::PullRequest(_) => ResourceKind::PullRequest,
            Self::Repository(_) => ResourceKind::Repository,
            Self::User(_) => ResourceKind::User,
            Self::VariableGroup(_) => ResourceKind::VariableGroup,
        }
    }

    /// Identifier of the wrapped resource.
    pub fn id(&self) -> Result<String> {
        match self {
            Self::Build(r) => r.id(),
            Self::PullRequest(r) => r.id(),
            Self::Repository(r) => r.id(),
            Self::User(r) => r.id(),
            Self::VariableGroup(r) => r.id(),
        }
    }

    /// State form of the wrapped resource.
    pub fn to_state(&self) -> Map<String, Value> {
        match self {
            Self::Build(r) => r.to_state(),
            Self::PullRequest(r) => r.to_state(),
            Self::Repository(r) => r.to_state(),
            Self::User(r) => r.to_state(),
            Self::VariableGroup(r) => r.to_state(),
        }
    }

    /// Wire form of the wrapped resource.
    pub fn to_wire(&self) -> Result<Value, CodecError> {
        match self {
            Self::Build(r) => r.to_wire(),
            Self::PullRequest(r) => r.to_wire(),
            Self::Repository(r) => r.to_wire(),
            Self::User(r) => r.to_wire(),
            Self::VariableGroup(r) => r.to_wire(),
        }
    }

    /// Runs [`Resource::update`] on the wrapped resource.
    pub async fn update_field(&mut self, session: &mut Session, field: &str, value: AttrValue) -> Result<()> {
        match self {
            Self::Build(r) => r.update(session, field, value).await,
            Self::PullRequest(r) => r.update(session, field, value).await,
            Self::Repository(r) => r.update(session, field, value).await,
            Self::User(r) => r.update(session, field, value).await,
            Self::VariableGroup(r) => r.update(session, field, value).await,
        }
    }
}
