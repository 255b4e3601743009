//
//  devops-state
//  resources/repository.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Git repositories.

use serde::{Deserialize, Serialize};

use super::{AnyResource, FieldSpec, Resource, ResourceDescriptor, ResourceKind};
use crate::codec::{AttrValue, Attributes, CodecError};
use crate::session::Scope;

/// A Git repository in a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: String,
    pub name: String,
    /// Full ref name, e.g. `refs/heads/main`. Empty repositories have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    /// Size in bytes
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub is_disabled: bool,
}

/// Body of a repository creation request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRepository {
    pub name: String,
}

impl CreateRepository {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Resource for Repository {
    const DESCRIPTOR: &'static ResourceDescriptor = &ResourceDescriptor {
        kind: ResourceKind::Repository,
        fields: &[
            FieldSpec::identifier("id"),
            FieldSpec::editable("name"),
            FieldSpec::editable("default_branch").wire("defaultBranch"),
            FieldSpec::field("remote_url").wire("remoteUrl"),
            FieldSpec::field("size"),
            FieldSpec::editable("is_disabled").wire("isDisabled"),
        ],
    };

    type CreateParams = CreateRepository;

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("id", self.id.as_str())
            .with("name", self.name.as_str())
            .with("default_branch", AttrValue::optional(self.default_branch.clone()))
            .with("remote_url", AttrValue::optional(self.remote_url.clone()))
            .with("size", self.size)
            .with("is_disabled", self.is_disabled)
    }

    fn from_attributes(mut attributes: Attributes) -> Result<Self, CodecError> {
        Ok(Self {
            id: attributes.take_string("id")?,
            name: attributes.take_string("name")?,
            default_branch: attributes.take_opt_string("default_branch")?,
            remote_url: attributes.take_opt_string("remote_url")?,
            size: attributes.take_i64("size")?,
            is_disabled: attributes.take_bool("is_disabled")?,
        })
    }

    fn into_any(self) -> AnyResource {
        AnyResource::Repository(self)
    }

    fn from_any(any: AnyResource) -> Option<Self> {
        match any {
            AnyResource::Repository(repository) => Some(repository),
            _ => None,
        }
    }

    fn collection_path(scope: &Scope) -> String {
        format!("/{}/_apis/git/repositories", scope.project)
    }

    fn item_path(scope: &Scope, id: &str) -> String {
        format!("/{}/_apis/git/repositories/{}", scope.project, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{repository, FakeRemote, Method};
    use crate::Error;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_state_roundtrip() {
        let mut repo = repository("r-1", "web");
        repo.default_branch = Some("refs/heads/main".into());
        repo.size = 2048;
        let state = repo.to_state();

        assert_eq!(state["size::int"], json!("2048"));
        assert_eq!(state["is_disabled::bool"], json!("false"));
        assert_eq!(Repository::from_state(&state).unwrap(), repo);
    }

    #[test]
    fn test_wire_names() {
        let wire = repository("r-1", "web").to_wire().unwrap();
        assert_eq!(wire["isDisabled"], json!(false));
        assert!(wire.get("is_disabled").is_none());
    }

    #[tokio::test]
    async fn test_create_update_delete_cycle() {
        let dir = TempDir::new().unwrap();
        let remote = FakeRemote::new();
        remote.on_post("/web/_apis/git/repositories", repository("r-1", "r1").to_wire().unwrap());
        let mut session = remote.tracked_session(&dir);

        let mut r1 = Repository::create(&mut session, &CreateRepository::new("r1"))
            .await
            .unwrap();
        let document = session.state().load().unwrap();
        let entries = document.entries(ResourceKind::Repository);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.get("r-1"), Some(&r1.to_state()));

        r1.update(&mut session, "name", "r2".into()).await.unwrap();
        assert_eq!(r1.name, "r2");
        let document = session.state().load().unwrap();
        assert_eq!(
            document.get(ResourceKind::Repository, "r-1").unwrap()["name"],
            json!("r2")
        );

        Repository::delete_by_id(&mut session, &r1.id).await.unwrap();
        let document = session.state().load().unwrap();
        assert!(document.get(ResourceKind::Repository, "r-1").is_none());

        let writes = remote.writes();
        assert_eq!(writes.len(), 3);
        assert_eq!(writes[1].method, Method::Patch);
        assert_eq!(writes[1].path, "/web/_apis/git/repositories/r-1");
        assert_eq!(writes[1].body, Some(json!({"name": "r2"})));
    }

    #[tokio::test]
    async fn test_update_uses_wire_name() {
        let remote = FakeRemote::new();
        let mut session = remote.session();
        let mut repo = repository("r-1", "web");

        repo.update(&mut session, "default_branch", "refs/heads/dev".into())
            .await
            .unwrap();
        assert_eq!(repo.default_branch.as_deref(), Some("refs/heads/dev"));
        assert_eq!(
            remote.writes()[0].body,
            Some(json!({"defaultBranch": "refs/heads/dev"}))
        );
    }

    #[tokio::test]
    async fn test_failed_update_leaves_resource_and_state() {
        let dir = TempDir::new().unwrap();
        let remote = FakeRemote::new();
        remote.fail(Method::Patch, "/web/_apis/git/repositories/r-1", 500);
        let mut session = remote.tracked_session(&dir);

        let mut repo = repository("r-1", "web");
        session
            .state_mut()
            .add(ResourceKind::Repository, "r-1", repo.to_state())
            .unwrap();

        let err = repo.update(&mut session, "name", "api".into()).await.unwrap_err();
        assert!(matches!(err, Error::Remote(_)));
        assert_eq!(repo.name, "web");
        let document = session.state().load().unwrap();
        assert_eq!(
            document.get(ResourceKind::Repository, "r-1").unwrap()["name"],
            json!("web")
        );
    }

    #[tokio::test]
    async fn test_update_rejects_wrong_value_kind_before_remote_call() {
        let remote = FakeRemote::new();
        let mut session = remote.session();
        let mut repo = repository("r-1", "web");

        let err = repo
            .update(&mut session, "is_disabled", "yes".into())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Codec(CodecError::TypeMismatch { .. })));
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_of_missing_resource_is_success() {
        let dir = TempDir::new().unwrap();
        let remote = FakeRemote::new();
        remote.fail(Method::Delete, "/web/_apis/git/repositories/gone", 404);
        let mut session = remote.tracked_session(&dir);
        session.state_mut().wipe().unwrap();
        let before = session.state().load().unwrap();

        Repository::delete_by_id(&mut session, "gone").await.unwrap();
        assert_eq!(session.state().load().unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_entry() {
        let dir = TempDir::new().unwrap();
        let remote = FakeRemote::new();
        remote.fail(Method::Delete, "/web/_apis/git/repositories/r-1", 409);
        let mut session = remote.tracked_session(&dir);
        session
            .state_mut()
            .add(ResourceKind::Repository, "r-1", repository("r-1", "web").to_state())
            .unwrap();

        let err = Repository::delete_by_id(&mut session, "r-1").await.unwrap_err();
        assert!(matches!(err, Error::RemoteConflict(_)));
        assert!(session
            .state()
            .load()
            .unwrap()
            .get(ResourceKind::Repository, "r-1")
            .is_some());
    }

    #[tokio::test]
    async fn test_get_all_reads_envelope() {
        let remote = FakeRemote::new();
        remote.on_get(
            "/web/_apis/git/repositories",
            json!({
                "count": 2,
                "value": [
                    repository("r-1", "web").to_wire().unwrap(),
                    repository("r-2", "api").to_wire().unwrap()
                ]
            }),
        );
        let session = remote.session();

        let all = Repository::get_all(&session).await.unwrap();
        let names: Vec<&str> = all.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["web", "api"]);
    }

    #[tokio::test]
    async fn test_get_missing_is_remote_not_found() {
        let remote = FakeRemote::new();
        let session = remote.session();
        let err = Repository::get_by_id(&session, "nope").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
