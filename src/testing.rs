//
//  devops-state
//  testing.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Test support: an in-memory remote and resource fixtures.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use serde_json::Value;
use tempfile::TempDir;

use crate::api::{ApiError, Transport};
use crate::resources::{Build, DefinitionRef, PullRequest, Repository, User, Variable, VariableGroup};
use crate::session::{Scope, Session};
use crate::state::{InitMode, StateConfig, StateStore};

/// Project every fixture session is scoped to.
pub const PROJECT: &str = "web";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

/// One recorded request.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Inner {
    calls: Vec<Call>,
    gets: HashMap<String, VecDeque<Value>>,
    posts: HashMap<String, Value>,
    failures: HashMap<(Method, String), u16>,
}

/// A fake remote that records every request.
///
/// GET responses are queued per path; the last queued response repeats.
/// Unknown GET paths answer 404. Writes succeed with an empty body unless a
/// failure was registered for them.
#[derive(Clone, Default)]
pub struct FakeRemote {
    inner: Arc<Mutex<Inner>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session with state tracking disabled.
    pub fn session(&self) -> Session {
        let store = StateStore::open(StateConfig::disabled());
        Session::new(Box::new(self.clone()), Scope::new(PROJECT), store).unwrap()
    }

    /// A session tracking state in `dir/state.json`.
    pub fn tracked_session(&self, dir: &TempDir) -> Session {
        let config = StateConfig::at(dir.path().join("state.json"), InitMode::CreateIfMissing);
        Session::new(Box::new(self.clone()), Scope::new(PROJECT), StateStore::open(config)).unwrap()
    }

    pub fn on_get(&self, path: &str, response: Value) {
        let mut inner = self.inner.lock().unwrap();
        inner.gets.entry(path.to_string()).or_default().push_back(response);
    }

    pub fn on_post(&self, path: &str, response: Value) {
        self.inner.lock().unwrap().posts.insert(path.to_string(), response);
    }

    /// Makes every `method` request to `path` fail with `status`.
    pub fn fail(&self, method: Method, path: &str, status: u16) {
        self.inner
            .lock()
            .unwrap()
            .failures
            .insert((method, path.to_string()), status);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Recorded non-GET requests.
    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method != Method::Get)
            .collect()
    }

    fn record(&self, method: Method, path: &str, body: Option<&Value>) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
        match inner.failures.get(&(method, path.to_string())) {
            Some(status) => {
                let status = StatusCode::from_u16(*status).unwrap();
                Err(ApiError::from_status(status, format!("{} {} failed", status, path)))
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Transport for FakeRemote {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.record(Method::Get, path, None)?;
        let mut inner = self.inner.lock().unwrap();
        let queue = inner
            .gets
            .get_mut(path)
            .ok_or_else(|| ApiError::NotFound(path.to_string()))?;
        match queue.len() {
            0 => Err(ApiError::NotFound(path.to_string())),
            1 => Ok(queue[0].clone()),
            _ => Ok(queue.pop_front().unwrap()),
        }
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.record(Method::Post, path, Some(body))?;
        Ok(self
            .inner
            .lock()
            .unwrap()
            .posts
            .get(path)
            .cloned()
            .unwrap_or(Value::Null))
    }

    async fn patch(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.record(Method::Patch, path, Some(body))?;
        Ok(Value::Null)
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.record(Method::Delete, path, None)
    }
}

pub fn user(descriptor: &str, display_name: &str) -> User {
    User {
        descriptor: descriptor.to_string(),
        display_name: display_name.to_string(),
        mail_address: Some(format!("{}@contoso.com", display_name.to_lowercase())),
        principal_name: Some(format!("{}@contoso.com", display_name.to_lowercase())),
    }
}

pub fn repository(id: &str, name: &str) -> Repository {
    Repository {
        id: id.to_string(),
        name: name.to_string(),
        default_branch: None,
        remote_url: Some(format!("https://dev.azure.com/contoso/{}/_git/{}", PROJECT, name)),
        size: 0,
        is_disabled: false,
    }
}

pub fn pull_request(id: i64, title: &str) -> PullRequest {
    PullRequest {
        pull_request_id: id,
        title: title.to_string(),
        description: None,
        status: "active".to_string(),
        created_by: user("aad.ana", "Ana"),
        creation_date: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
        repository: repository("r-1", "web"),
        source_ref_name: "refs/heads/feature".to_string(),
        target_ref_name: "refs/heads/main".to_string(),
        is_draft: false,
    }
}

pub fn variable_group(id: i64, name: &str) -> VariableGroup {
    let mut variables = BTreeMap::new();
    variables.insert("REGION".to_string(), Variable::plain("eu-west"));
    variables.insert(
        "TOKEN".to_string(),
        Variable {
            value: None,
            is_secret: true,
        },
    );
    VariableGroup {
        id,
        name: name.to_string(),
        description: Some("Shared settings".to_string()),
        group_type: "Vsts".to_string(),
        variables,
    }
}

pub fn build(id: i64) -> Build {
    Build {
        id,
        build_number: format!("20250102.{}", id),
        status: "inProgress".to_string(),
        result: None,
        definition: DefinitionRef {
            id: 12,
            name: "ci".to_string(),
        },
        source_branch: Some("refs/heads/main".to_string()),
        queue_time: Utc.with_ymd_and_hms(2025, 1, 2, 3, 0, 0).unwrap(),
        finish_time: None,
        keep_forever: false,
        tags: Vec::new(),
        requested_for: None,
    }
}
