//
//  devops-state
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! The boundary between the resource layer and the HTTP collaborator.
//!
//! Resource types only ever talk to a [`Transport`]. The production
//! implementation is [`DevOpsClient`](super::DevOpsClient); tests substitute an
//! in-memory fake that records every call.

use async_trait::async_trait;
use serde_json::Value;

use super::ApiError;

/// Structured JSON requests against the remote API.
///
/// Paths are relative to the organization URL (for example
/// `/web/_apis/git/repositories`). Implementations return the decoded JSON
/// body on success (`Value::Null` for empty bodies) and a classified
/// [`ApiError`] on failure.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET request.
    async fn get(&self, path: &str) -> Result<Value, ApiError>;

    /// Issues a POST request with a JSON body.
    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    /// Issues a PATCH request with a JSON body (partial update).
    async fn patch(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    /// Issues a DELETE request.
    async fn delete(&self, path: &str) -> Result<(), ApiError>;
}
