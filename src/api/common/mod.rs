//
//  devops-state
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types
//!
//! This module provides the types shared by every resource endpoint: the
//! transport error classification and the list envelope returned by
//! collection endpoints.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all remote calls
//! - [`ListResponse`] - `{count, value}` envelope (re-exported from [`pagination`])
//!
//! # Notes
//!
//! - The resource contract only interprets `NotFound` and `Conflict`; every
//!   other variant is surfaced to the caller unchanged.
//! - Classification happens once, in [`ApiError::from_status`], so fake
//!   transports used in tests can produce the same variants.

use reqwest::StatusCode;
use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Unified error type for all remote API operations.
///
/// `ApiError` covers every failure a transport can report. It implements the
/// standard `Error` trait via `thiserror`.
///
/// # Variants
///
/// | Variant | Description | HTTP Status |
/// |---------|-------------|-------------|
/// | `AuthRequired` | Missing or rejected credentials | 401 |
/// | `Forbidden` | Insufficient permissions | 403 |
/// | `NotFound` | Resource does not exist | 404 |
/// | `Conflict` | Resource state conflicts with the request | 409 |
/// | `BadRequest` | Invalid request parameters | 400 |
/// | `RateLimited` | Too many requests | 429 |
/// | `ServerError` | Internal server error | 5xx |
/// | `Network` | Connectivity issues | N/A |
/// | `InvalidResponse` | Body could not be decoded | N/A |
/// | `Unknown` | Anything else | N/A |
#[derive(Error, Debug)]
pub enum ApiError {
    /// Credentials are missing or were rejected.
    #[error("Authentication required: {0}")]
    AuthRequired(String),

    /// The authenticated user may not perform this operation.
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// The requested resource was not found.
    ///
    /// # Parameters
    ///
    /// - `0` - Description of the resource that was not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The request conflicts with the current state of the resource.
    ///
    /// Typical causes are duplicate names on create or stale revisions on
    /// update.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The request was malformed or contained invalid parameters.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// API rate limit has been exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// The remote service failed (HTTP 5xx).
    #[error("Server error: {0}")]
    ServerError(String),

    /// A network-level error occurred during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not the JSON shape the caller expected.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// An unknown or unexpected error occurred.
    #[error("Unknown error ({status}): {message}")]
    Unknown {
        /// HTTP status code returned by the server
        status: u16,
        /// Message extracted from the response body
        message: String,
    },
}

impl ApiError {
    /// Classifies a non-success HTTP status into an [`ApiError`].
    ///
    /// # Parameters
    ///
    /// * `status` - The HTTP status code of the response
    /// * `message` - The user-facing message extracted from the body
    ///
    /// # Example
    ///
    /// ```rust
    /// use devops_state::api::ApiError;
    /// use reqwest::StatusCode;
    ///
    /// let err = ApiError::from_status(StatusCode::NOT_FOUND, "repository 'web'".to_string());
    /// assert!(err.is_not_found());
    /// ```
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::AuthRequired(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::CONFLICT => Self::Conflict(message),
            StatusCode::BAD_REQUEST => Self::BadRequest(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            s if s.is_server_error() => Self::ServerError(message),
            s => Self::Unknown {
                status: s.as_u16(),
                message,
            },
        }
    }

    /// Returns `true` when the remote reported the resource as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` when the remote reported a conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        assert!(ApiError::from_status(StatusCode::NOT_FOUND, "x".into()).is_not_found());
        assert!(ApiError::from_status(StatusCode::CONFLICT, "x".into()).is_conflict());
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "x".into()),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "x".into()),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, "x".into()),
            ApiError::Unknown { status: 418, .. }
        ));
    }
}
