//
//  devops-state
//  resources/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Resource Contract
//!
//! Every remote object the library manages implements [`Resource`]. The
//! trait supplies the whole lifecycle (create, fetch, list, update, delete)
//! as provided methods; a resource type only describes itself:
//!
//! - its field metadata ([`Resource::DESCRIPTOR`]),
//! - its attributes for the state codec ([`Resource::attributes`],
//!   [`Resource::from_attributes`]),
//! - its endpoint paths ([`Resource::collection_path`], [`Resource::item_path`]).
//!
//! The wire form is the type's own `serde` representation.
//!
//! ## State Bookkeeping
//!
//! | Operation | Remote call | State effect |
//! |-----------|-------------|--------------|
//! | `create` | POST | entry added |
//! | `get_by_id` / `get_all` | GET | none |
//! | `update` | PATCH one field | entry overwritten |
//! | `delete_by_id` | DELETE | entry removed (also when already gone) |
//!
//! Local validation (read-only types, non-editable fields) fails before any
//! remote call is made.
//!
//! ## Resource Types
//!
//! | Type | Identifier | Editable | Create / Delete |
//! |------|------------|----------|-----------------|
//! | [`Repository`] | `id` | `name`, `default_branch`, `is_disabled` | yes / yes |
//! | [`PullRequest`] | `pull_request_id` | `title`, `description`, `status`, `is_draft` | yes / abandons |
//! | [`VariableGroup`] | `id` | `name`, `description`, `variables` | yes / yes |
//! | [`Build`] | `id` | `keep_forever` | queues / yes |
//! | [`User`] | `descriptor` | none | no / no |

mod build;
mod metadata;
mod pull_request;
mod registry;
mod repository;
mod user;
mod variable_group;

pub use build::{Build, DefinitionRef, PollPolicy, QueueBuild};
pub use metadata::{
    EditableFields, FieldSpec, MetadataError, Registry, ResourceDescriptor, TypeMetadata,
};
pub use pull_request::{CreatePullRequest, PullRequest};
pub use registry::{AnyResource, ResourceKind};
pub use repository::{CreateRepository, Repository};
pub use user::User;
pub use variable_group::{CreateVariableGroup, Variable, VariableGroup};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::api::ListResponse;
use crate::codec::{self, AttrValue, Attributes, CodecError};
use crate::session::{Scope, Session};
use crate::{Error, Result};

/// The capability set every resource type provides.
#[async_trait]
pub trait Resource: Sized + Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Field metadata of this type.
    const DESCRIPTOR: &'static ResourceDescriptor;

    /// Request body accepted by [`Resource::create`].
    type CreateParams: Serialize + Send + Sync;

    /// The resource's attributes, in declaration order.
    fn attributes(&self) -> Attributes;

    /// Rebuilds a resource from its attributes.
    fn from_attributes(attributes: Attributes) -> Result<Self, CodecError>;

    fn into_any(self) -> AnyResource;

    /// Unwraps an [`AnyResource`] of this type.
    fn from_any(any: AnyResource) -> Option<Self>;

    /// Path of the collection endpoint (list, and create by default).
    fn collection_path(scope: &Scope) -> String;

    /// Path of a single resource.
    fn item_path(scope: &Scope, id: &str) -> String;

    fn create_path(scope: &Scope, _params: &Self::CreateParams) -> String {
        Self::collection_path(scope)
    }

    fn create_body(_scope: &Scope, params: &Self::CreateParams) -> Result<Value, CodecError> {
        Ok(serde_json::to_value(params)?)
    }

    /// Path partial updates of this instance are sent to.
    fn update_path(&self, scope: &Scope) -> Result<String> {
        Ok(Self::item_path(scope, &self.id()?))
    }

    fn delete_path(scope: &Scope, id: &str) -> String {
        Self::item_path(scope, id)
    }

    /// Read-only types return `false`; `create` then fails with `NotSupported`.
    fn supports_create() -> bool {
        true
    }

    /// Read-only types return `false`; `delete_by_id` then fails with `NotSupported`.
    fn supports_delete() -> bool {
        true
    }

    fn kind() -> ResourceKind {
        Self::DESCRIPTOR.kind
    }

    /// Value of the identifier field, as text.
    fn id(&self) -> Result<String> {
        let id_field = Registry::global()?.id_field(Self::kind())?;
        self.attributes()
            .get(id_field)
            .and_then(AttrValue::as_id)
            .ok_or_else(|| CodecError::missing(id_field).into())
    }

    fn to_wire(&self) -> Result<Value, CodecError> {
        Ok(serde_json::to_value(self)?)
    }

    fn from_wire(payload: Value) -> Result<Self, CodecError> {
        Ok(serde_json::from_value(payload)?)
    }

    fn to_state(&self) -> Map<String, Value> {
        codec::encode(self)
    }

    fn from_state(entry: &Map<String, Value>) -> Result<Self, CodecError> {
        codec::decode(entry)
    }

    /// Replaces one attribute in memory, re-validating the whole resource.
    fn set_attribute(&mut self, name: &str, value: AttrValue) -> Result<(), CodecError> {
        let mut attributes = self.attributes();
        if attributes.get(name).is_none() {
            return Err(CodecError::UnknownField {
                type_name: Self::kind().type_name(),
                field: name.to_string(),
            });
        }
        attributes.insert(name, value);
        *self = Self::from_attributes(attributes)?;
        Ok(())
    }

    /// Creates the remote resource and starts tracking it.
    ///
    /// # Errors
    ///
    /// - [`Error::NotSupported`] for read-only types, before any remote call
    /// - remote and codec errors; no state entry is written in that case
    async fn create(session: &mut Session, params: &Self::CreateParams) -> Result<Self> {
        let kind = Self::kind();
        if !Self::supports_create() {
            return Err(Error::NotSupported {
                kind,
                operation: "create",
            });
        }

        let path = Self::create_path(session.scope(), params);
        let body = Self::create_body(session.scope(), params)?;
        let payload = session.transport().post(&path, &body).await?;
        let resource = Self::from_wire(payload)?;
        let id = resource.id()?;

        session.state_mut().add(kind, &id, resource.to_state())?;
        info!("Created {} {}", kind, id);
        Ok(resource)
    }

    /// Fetches one resource. A missing resource is [`Error::RemoteNotFound`].
    async fn get_by_id(session: &Session, id: &str) -> Result<Self> {
        let path = Self::item_path(session.scope(), id);
        let payload = session.transport().get(&path).await?;
        Ok(Self::from_wire(payload)?)
    }

    /// Lists every resource of this type in the session's project.
    async fn get_all(session: &Session) -> Result<Vec<Self>> {
        let path = Self::collection_path(session.scope());
        let payload = session.transport().get(&path).await?;
        let page: ListResponse<Value> = ListResponse::from_value(payload)?;
        debug!("Listed {} {} resource(s)", page.value.len(), Self::kind());
        page.value
            .into_iter()
            .map(|item| Self::from_wire(item).map_err(Error::from))
            .collect()
    }

    /// Issues the remote deletion. Overridden by types that delete differently.
    async fn delete_remote(session: &Session, id: &str) -> Result<()> {
        let path = Self::delete_path(session.scope(), id);
        session.transport().delete(&path).await?;
        Ok(())
    }

    /// Deletes the remote resource and stops tracking it.
    ///
    /// A resource the remote reports as already gone counts as deleted. Any
    /// other failure is returned and the state entry is kept for a retry.
    async fn delete_by_id(session: &mut Session, id: &str) -> Result<()> {
        let kind = Self::kind();
        if !Self::supports_delete() {
            return Err(Error::NotSupported {
                kind,
                operation: "delete",
            });
        }

        match Self::delete_remote(session, id).await {
            Ok(()) => info!("Deleted {} {}", kind, id),
            Err(Error::RemoteNotFound(message)) => {
                debug!("{} {} already gone: {}", kind, id, message)
            }
            Err(e) => return Err(e),
        }

        session.state_mut().remove(kind, id)?;
        Ok(())
    }

    /// Changes one editable field on the remote resource and in memory.
    ///
    /// On success exactly one PATCH is sent and the state entry is rewritten
    /// once. On failure neither the in-memory resource nor the state changes.
    ///
    /// # Errors
    ///
    /// - [`Error::NotEditable`] if `field` is not declared editable, before any remote call
    /// - [`Error::Codec`] if `value` does not fit the field, before any remote call
    async fn update(&mut self, session: &mut Session, field: &str, value: AttrValue) -> Result<()> {
        let kind = Self::kind();
        let wire_name = Registry::global()?
            .editable_fields(kind)?
            .wire_name(field)
            .ok_or_else(|| Error::NotEditable {
                kind,
                field: field.to_string(),
            })?;

        let mut updated = self.clone();
        updated.set_attribute(field, value)?;
        let wire_value = updated
            .to_wire()?
            .get(wire_name)
            .cloned()
            .unwrap_or(Value::Null);

        let mut body = Map::new();
        body.insert(wire_name.to_string(), wire_value);
        let path = self.update_path(session.scope())?;
        session.transport().patch(&path, &Value::Object(body)).await?;

        *self = updated;
        let id = self.id()?;
        session.state_mut().update(kind, &id, self.to_state())?;
        info!("Updated {} {} field '{}'", kind, id, field);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
