//
//  devops-state
//  resources/user.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Directory users.
//!
//! Users are read-only: they come from the organization's identity directory
//! and can be fetched, listed and imported, but never created or deleted
//! through this library.

use serde::{Deserialize, Serialize};

use super::{AnyResource, FieldSpec, Resource, ResourceDescriptor, ResourceKind};
use crate::codec::{AttrValue, Attributes, CodecError};
use crate::session::Scope;

/// A user from the identity directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Graph descriptor, e.g. `aad.M2Y2...`
    pub descriptor: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail_address: Option<String>,
    /// Sign-in name. Identity references on other resources call it `uniqueName`.
    #[serde(default, alias = "uniqueName", skip_serializing_if = "Option::is_none")]
    pub principal_name: Option<String>,
}

impl Resource for User {
    const DESCRIPTOR: &'static ResourceDescriptor = &ResourceDescriptor {
        kind: ResourceKind::User,
        fields: &[
            FieldSpec::identifier("descriptor"),
            FieldSpec::field("display_name").wire("displayName"),
            FieldSpec::field("mail_address").wire("mailAddress"),
            FieldSpec::field("principal_name").wire("principalName"),
        ],
    };

    type CreateParams = ();

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("descriptor", self.descriptor.as_str())
            .with("display_name", self.display_name.as_str())
            .with("mail_address", AttrValue::optional(self.mail_address.clone()))
            .with("principal_name", AttrValue::optional(self.principal_name.clone()))
    }

    fn from_attributes(mut attributes: Attributes) -> Result<Self, CodecError> {
        Ok(Self {
            descriptor: attributes.take_string("descriptor")?,
            display_name: attributes.take_string("display_name")?,
            mail_address: attributes.take_opt_string("mail_address")?,
            principal_name: attributes.take_opt_string("principal_name")?,
        })
    }

    fn into_any(self) -> AnyResource {
        AnyResource::User(self)
    }

    fn from_any(any: AnyResource) -> Option<Self> {
        match any {
            AnyResource::User(user) => Some(user),
            _ => None,
        }
    }

    fn collection_path(_scope: &Scope) -> String {
        "/_apis/graph/users".to_string()
    }

    fn item_path(_scope: &Scope, id: &str) -> String {
        format!("/_apis/graph/users/{}", id)
    }

    fn supports_create() -> bool {
        false
    }

    fn supports_delete() -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{user, FakeRemote};
    use crate::Error;
    use serde_json::json;

    #[test]
    fn test_state_roundtrip() {
        let ana = user("aad.ana", "Ana");
        assert_eq!(User::from_state(&ana.to_state()).unwrap(), ana);

        let bare = User {
            descriptor: "aad.bare".into(),
            display_name: "None".into(),
            mail_address: None,
            principal_name: None,
        };
        let state = bare.to_state();
        assert_eq!(state["display_name"], json!("None"));
        assert_eq!(state["mail_address::none"], json!(null));
        assert_eq!(User::from_state(&state).unwrap(), bare);
    }

    #[test]
    fn test_identity_reference_alias() {
        let payload = json!({
            "descriptor": "aad.ana",
            "displayName": "Ana",
            "uniqueName": "ana@contoso.com",
            "id": "d6245f20"
        });
        let user = User::from_wire(payload).unwrap();
        assert_eq!(user.principal_name.as_deref(), Some("ana@contoso.com"));
        assert_eq!(user.id().unwrap(), "aad.ana");
    }

    #[tokio::test]
    async fn test_create_and_delete_are_not_supported() {
        let remote = FakeRemote::new();
        let mut session = remote.session();

        let err = User::create(&mut session, &()).await.unwrap_err();
        assert!(matches!(err, Error::NotSupported { operation: "create", .. }));

        let err = User::delete_by_id(&mut session, "aad.ana").await.unwrap_err();
        assert!(matches!(err, Error::NotSupported { operation: "delete", .. }));

        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_not_editable_fails_before_remote_call() {
        let remote = FakeRemote::new();
        let mut session = remote.session();
        let mut ana = user("aad.ana", "Ana");

        let err = ana
            .update(&mut session, "display_name", "Bob".into())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotEditable { .. }));
        assert_eq!(ana.display_name, "Ana");
        assert!(remote.calls().is_empty());
    }
}
