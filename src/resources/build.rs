//
//  devops-state
//  resources/build.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Builds
//!
//! Creating a build queues a run of an existing pipeline definition. Builds
//! finish asynchronously on the remote side; [`Build::wait_for_completion`]
//! polls until the build reports `completed`.
//!
//! ## Polling
//!
//! Polling is a plain loop: fetch, check, sleep a fixed interval. It gives
//! up with [`Error::PollTimeout`] after [`PollPolicy::max_attempts`] checks.
//! There is no other cancellation; dropping the future stops it.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use devops_state::resources::{Build, PollPolicy, QueueBuild, Resource};
//! # async fn run(session: &mut devops_state::Session) -> devops_state::Result<()> {
//! let mut build = Build::create(session, &QueueBuild::new(12).on_branch("refs/heads/main")).await?;
//! build.wait_for_completion(session, &PollPolicy::new(Duration::from_secs(5), 120)).await?;
//! println!("{}: {:?}", build.build_number, build.result);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AnyResource, FieldSpec, Resource, ResourceDescriptor, ResourceKind, User};
use crate::codec::{expect_string, AttrValue, Attributes, CodecError};
use crate::session::{Scope, Session};
use crate::{Error, Result};

/// Status of a build that has stopped running.
pub const STATUS_COMPLETED: &str = "completed";

/// Reference to the pipeline definition a build runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionRef {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl DefinitionRef {
    fn to_attr(&self) -> AttrValue {
        let mut map = BTreeMap::new();
        map.insert("id".to_string(), AttrValue::Int(self.id));
        map.insert("name".to_string(), AttrValue::Str(self.name.clone()));
        AttrValue::Map(map)
    }

    fn from_attr(mut map: BTreeMap<String, AttrValue>) -> Result<Self, CodecError> {
        let id = match map.remove("id") {
            Some(AttrValue::Int(id)) => id,
            Some(other) => return Err(CodecError::mismatch("definition.id", "int", other.kind_name())),
            None => return Err(CodecError::missing("definition.id")),
        };
        let name = match map.remove("name") {
            Some(value) => expect_string("definition.name", value)?,
            None => String::new(),
        };
        Ok(Self { id, name })
    }
}

/// A pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: i64,
    pub build_number: String,
    /// `notStarted`, `inProgress`, `cancelling`, `postponed` or `completed`
    pub status: String,
    /// Set once completed: `succeeded`, `partiallySucceeded`, `failed` or `canceled`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    pub definition: DefinitionRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_branch: Option<String>,
    pub queue_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub keep_forever: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_for: Option<User>,
}

impl Build {
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }

    /// Polls the remote until this build completes.
    ///
    /// `self` is refreshed after every check. If the build is tracked, its
    /// state entry is updated with the completed form.
    ///
    /// # Errors
    ///
    /// - [`Error::PollTimeout`] if the build is still running after
    ///   `policy.max_attempts` checks
    /// - any error from fetching the build
    pub async fn wait_for_completion(&mut self, session: &mut Session, policy: &PollPolicy) -> Result<()> {
        let id = self.id()?;

        for attempt in 1..=policy.max_attempts {
            *self = Self::get_by_id(session, &id).await?;
            if self.is_completed() {
                debug!("Build {} completed after {} check(s)", id, attempt);
                if session.state().contains(ResourceKind::Build, &id)? {
                    session.state_mut().update(ResourceKind::Build, &id, self.to_state())?;
                }
                return Ok(());
            }

            debug!("Build {} is {} (check {}/{})", id, self.status, attempt, policy.max_attempts);
            if attempt < policy.max_attempts {
                tokio::time::sleep(policy.interval).await;
            }
        }

        Err(Error::PollTimeout {
            kind: ResourceKind::Build,
            id,
            attempts: policy.max_attempts,
        })
    }
}

/// Fixed-interval polling with an attempt cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between checks
    pub interval: Duration,
    /// Maximum number of checks
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(10), 60)
    }
}

#[derive(Debug, Clone, Serialize)]
struct DefinitionId {
    id: i64,
}

/// Body of a queue request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueBuild {
    definition: DefinitionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_branch: Option<String>,
}

impl QueueBuild {
    /// Queues a run of the definition with this id.
    pub fn new(definition_id: i64) -> Self {
        Self {
            definition: DefinitionId { id: definition_id },
            source_branch: None,
        }
    }

    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.source_branch = Some(branch.into());
        self
    }
}

impl Resource for Build {
    const DESCRIPTOR: &'static ResourceDescriptor = &ResourceDescriptor {
        kind: ResourceKind::Build,
        fields: &[
            FieldSpec::identifier("id"),
            FieldSpec::field("build_number").wire("buildNumber"),
            FieldSpec::field("status"),
            FieldSpec::field("result"),
            FieldSpec::field("definition"),
            FieldSpec::field("source_branch").wire("sourceBranch"),
            FieldSpec::field("queue_time").wire("queueTime"),
            FieldSpec::field("finish_time").wire("finishTime"),
            FieldSpec::editable("keep_forever").wire("keepForever"),
            FieldSpec::field("tags"),
            FieldSpec::field("requested_for").wire("requestedFor"),
        ],
    };

    type CreateParams = QueueBuild;

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("id", self.id)
            .with("build_number", self.build_number.as_str())
            .with("status", self.status.as_str())
            .with("result", AttrValue::optional(self.result.clone()))
            .with("definition", self.definition.to_attr())
            .with("source_branch", AttrValue::optional(self.source_branch.clone()))
            .with("queue_time", self.queue_time)
            .with("finish_time", AttrValue::optional(self.finish_time))
            .with("keep_forever", self.keep_forever)
            .with("tags", self.tags.clone())
            .with(
                "requested_for",
                self.requested_for
                    .clone()
                    .map(AttrValue::resource)
                    .unwrap_or(AttrValue::Null),
            )
    }

    fn from_attributes(mut attributes: Attributes) -> Result<Self, CodecError> {
        let definition = match attributes.take("definition")? {
            AttrValue::Map(map) => DefinitionRef::from_attr(map)?,
            other => return Err(CodecError::mismatch("definition", "map", other.kind_name())),
        };

        Ok(Self {
            id: attributes.take_i64("id")?,
            build_number: attributes.take_string("build_number")?,
            status: attributes.take_string("status")?,
            result: attributes.take_opt_string("result")?,
            definition,
            source_branch: attributes.take_opt_string("source_branch")?,
            queue_time: attributes.take_datetime("queue_time")?,
            finish_time: attributes.take_opt_datetime("finish_time")?,
            keep_forever: attributes.take_bool("keep_forever")?,
            tags: attributes.take_string_list("tags")?,
            requested_for: attributes.take_opt_resource("requested_for")?,
        })
    }

    fn into_any(self) -> AnyResource {
        AnyResource::Build(self)
    }

    fn from_any(any: AnyResource) -> Option<Self> {
        match any {
            AnyResource::Build(build) => Some(build),
            _ => None,
        }
    }

    fn collection_path(scope: &Scope) -> String {
        format!("/{}/_apis/build/builds", scope.project)
    }

    fn item_path(scope: &Scope, id: &str) -> String {
        format!("/{}/_apis/build/builds/{}", scope.project, id)
    }
}
