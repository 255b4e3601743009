//
//  devops-state
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! HTTP plumbing for the REST API. Everything above this layer talks to a
//! [`Transport`]; nothing above it knows about `reqwest`.
//!
//! ## Architecture
//!
//! - [`client`]: [`DevOpsClient`], the `reqwest` implementation of [`Transport`]
//! - [`transport`]: the [`Transport`] trait
//! - [`common`]: [`ApiError`] classification and the list envelope
//!
//! ## Error Handling
//!
//! API errors are returned as [`ApiError`] variants, which map to common HTTP
//! error scenarios:
//!
//! - `AuthRequired`: 401 Unauthorized
//! - `Forbidden`: 403 Forbidden
//! - `NotFound`: 404 Not Found
//! - `Conflict`: 409 Conflict
//! - `RateLimited`: 429 Too Many Requests
//! - `ServerError`: 5xx Server Errors

/// `reqwest` implementation of [`Transport`].
pub mod client;

/// Shared error and envelope types.
pub mod common;

/// The transport trait resource types are written against.
pub mod transport;

pub use client::DevOpsClient;
pub use common::{ApiError, ListResponse};
pub use transport::Transport;
