//
//  devops-state
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client for the REST API
//!
//! This module provides the production [`Transport`] implementation. It
//! handles authentication, the `api-version` query parameter, and mapping
//! non-success responses to [`ApiError`] variants.
//!
//! ## Features
//!
//! - Basic authentication header injection
//! - JSON serialization/deserialization
//! - Error message extraction from the platform's error payloads
//! - Custom User-Agent header

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{ApiError, Transport};
use crate::auth::AuthCredential;

/// API version sent with every request unless configured otherwise.
pub const DEFAULT_API_VERSION: &str = "7.1";

/// Extracts a user-friendly message from an error response body.
///
/// The platform returns errors in the format:
/// ```json
/// {"$id": "1", "message": "Human readable message", "typeKey": "..."}
/// ```
///
/// Some gateways wrap it as `{"error": {"message": "..."}}`. If neither shape
/// matches, the raw body (or the status text for empty bodies) is returned.
///
/// # Parameters
///
/// * `status` - The HTTP status code
/// * `body` - The raw error response body
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }

        if let Some(message) = json
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        body.to_string()
    }
}

/// The HTTP client for the REST API.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use devops_state::api::DevOpsClient;
/// use devops_state::auth::AuthCredential;
///
/// let client = DevOpsClient::new("https://dev.azure.com/contoso")?
///     .with_auth(AuthCredential::personal_access_token("my-pat"));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct DevOpsClient {
    /// The underlying HTTP client
    http: Client,
    /// Organization URL without a trailing slash
    base_url: String,
    /// Value of the `api-version` query parameter
    api_version: String,
    /// Optional authentication credentials
    auth: Option<AuthCredential>,
}

impl DevOpsClient {
    /// Creates a client for an organization URL.
    ///
    /// # Parameters
    ///
    /// * `organization_url` - e.g. `https://dev.azure.com/contoso`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or the HTTP client could not
    /// be created.
    pub fn new(organization_url: &str) -> anyhow::Result<Self> {
        let parsed = Url::parse(organization_url)?;
        if !matches!(parsed.scheme(), "https" | "http") {
            anyhow::bail!("Unsupported URL scheme: {}", parsed.scheme());
        }

        Ok(Self {
            http: Client::builder()
                .user_agent(format!("dvs/{}", crate::VERSION))
                .build()?,
            base_url: organization_url.trim_end_matches('/').to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            auth: None,
        })
    }

    /// Sets the authentication credentials for this client.
    pub fn with_auth(mut self, auth: AuthCredential) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Overrides the `api-version` query parameter.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Returns the organization URL requests are made against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the full request URL for a path, adding `api-version` unless the
    /// path already carries one.
    pub fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ApiError::BadRequest(format!("invalid path '{}': {}", path, e)))?;
        let has_version = url.query_pairs().any(|(key, _)| key == "api-version");
        if !has_version {
            url.query_pairs_mut()
                .append_pair("api-version", &self.api_version);
        }
        Ok(url)
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Response, ApiError> {
        let url = self.url_for(path)?;
        debug!("{} {}", method, url);

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(auth) = &self.auth {
            request = auth.apply_to_request(request);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(
                status,
                extract_error_message(status, &text),
            ));
        }

        Ok(response)
    }

    async fn send_json(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let response = self.send(method, path, body).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl Transport for DevOpsClient {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send_json(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.send_json(Method::POST, path, Some(body)).await
    }

    async fn patch(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.send_json(Method::PATCH, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, None).await?;
        Ok(())
    }
}
