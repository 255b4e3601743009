//
//  devops-state
//  resources/pull_request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pull requests.
//!
//! A pull request owns two nested resources by value: its author
//! ([`User`]) and its target [`Repository`]. Both are stored in the state
//! entry under tagged keys (`created_by::User`, `repository::Repository`).
//!
//! Pull requests cannot be removed remotely; deleting one abandons it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::{AnyResource, FieldSpec, Repository, Resource, ResourceDescriptor, ResourceKind, User};
use crate::codec::{AttrValue, Attributes, CodecError};
use crate::session::{Scope, Session};
use crate::Result;

/// Status value that marks a pull request as abandoned.
pub const STATUS_ABANDONED: &str = "abandoned";

/// A pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub pull_request_id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `active`, `completed` or `abandoned`
    pub status: String,
    pub created_by: User,
    pub creation_date: DateTime<Utc>,
    pub repository: Repository,
    pub source_ref_name: String,
    pub target_ref_name: String,
    #[serde(default)]
    pub is_draft: bool,
}

/// Body of a pull request creation request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePullRequest {
    /// Repository the pull request is opened in. Part of the path, not the body.
    #[serde(skip)]
    pub repository_id: String,
    pub source_ref_name: String,
    pub target_ref_name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_draft: bool,
}

impl CreatePullRequest {
    pub fn new(
        repository_id: impl Into<String>,
        source_ref_name: impl Into<String>,
        target_ref_name: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            repository_id: repository_id.into(),
            source_ref_name: source_ref_name.into(),
            target_ref_name: target_ref_name.into(),
            title: title.into(),
            description: None,
            is_draft: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn draft(mut self) -> Self {
        self.is_draft = true;
        self
    }
}

fn repository_pulls_path(scope: &Scope, repository_id: &str) -> String {
    format!(
        "/{}/_apis/git/repositories/{}/pullrequests",
        scope.project, repository_id
    )
}

#[async_trait]
impl Resource for PullRequest {
    const DESCRIPTOR: &'static ResourceDescriptor = &ResourceDescriptor {
        kind: ResourceKind::PullRequest,
        fields: &[
            FieldSpec::identifier("pull_request_id").wire("pullRequestId"),
            FieldSpec::editable("title"),
            FieldSpec::editable("description"),
            FieldSpec::editable("status"),
            FieldSpec::field("created_by").wire("createdBy"),
            FieldSpec::field("creation_date").wire("creationDate"),
            FieldSpec::field("repository"),
            FieldSpec::field("source_ref_name").wire("sourceRefName"),
            FieldSpec::field("target_ref_name").wire("targetRefName"),
            FieldSpec::editable("is_draft").wire("isDraft"),
        ],
    };

    type CreateParams = CreatePullRequest;

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("pull_request_id", self.pull_request_id)
            .with("title", self.title.as_str())
            .with("description", AttrValue::optional(self.description.clone()))
            .with("status", self.status.as_str())
            .with("created_by", AttrValue::resource(self.created_by.clone()))
            .with("creation_date", self.creation_date)
            .with("repository", AttrValue::resource(self.repository.clone()))
            .with("source_ref_name", self.source_ref_name.as_str())
            .with("target_ref_name", self.target_ref_name.as_str())
            .with("is_draft", self.is_draft)
    }

    fn from_attributes(mut attributes: Attributes) -> Result<Self, CodecError> {
        Ok(Self {
            pull_request_id: attributes.take_i64("pull_request_id")?,
            title: attributes.take_string("title")?,
            description: attributes.take_opt_string("description")?,
            status: attributes.take_string("status")?,
            created_by: attributes.take_resource("created_by")?,
            creation_date: attributes.take_datetime("creation_date")?,
            repository: attributes.take_resource("repository")?,
            source_ref_name: attributes.take_string("source_ref_name")?,
            target_ref_name: attributes.take_string("target_ref_name")?,
            is_draft: attributes.take_bool("is_draft")?,
        })
    }

    fn into_any(self) -> AnyResource {
        AnyResource::PullRequest(self)
    }

    fn from_any(any: AnyResource) -> Option<Self> {
        match any {
            AnyResource::PullRequest(pull_request) => Some(pull_request),
            _ => None,
        }
    }

    fn collection_path(scope: &Scope) -> String {
        format!("/{}/_apis/git/pullrequests", scope.project)
    }

    fn item_path(scope: &Scope, id: &str) -> String {
        format!("/{}/_apis/git/pullrequests/{}", scope.project, id)
    }

    fn create_path(scope: &Scope, params: &CreatePullRequest) -> String {
        repository_pulls_path(scope, &params.repository_id)
    }

    /// Updates go through the owning repository.
    fn update_path(&self, scope: &Scope) -> Result<String> {
        Ok(format!(
            "{}/{}",
            repository_pulls_path(scope, &self.repository.id),
            self.pull_request_id
        ))
    }

    /// Abandons the pull request instead of deleting it.
    async fn delete_remote(session: &Session, id: &str) -> Result<()> {
        let pull_request = Self::get_by_id(session, id).await?;
        if pull_request.status == STATUS_ABANDONED {
            debug!("Pull request {} is already abandoned", id);
            return Ok(());
        }

        let path = pull_request.update_path(session.scope())?;
        session
            .transport()
            .patch(&path, &json!({ "status": STATUS_ABANDONED }))
            .await?;
        Ok(())
    }
}
