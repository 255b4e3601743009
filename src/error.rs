//
//  devops-state
//  error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Error Taxonomy
//!
//! Every library operation returns [`Error`]. The variants fall into three
//! groups:
//!
//! | Group | Variants | Reaches the remote? |
//! |-------|----------|---------------------|
//! | Local validation | `Metadata`, `NotEditable`, `NotSupported`, `Codec` | Never |
//! | Remote outcome | `RemoteNotFound`, `RemoteConflict`, `Remote`, `PollTimeout` | Yes |
//! | Bookkeeping | `State`, `PartialFailure` | N/A |
//!
//! A corrupt or wrong-version state file surfaces as
//! `Error::State(StateError::Corrupt { .. })` or
//! `Error::State(StateError::VersionMismatch { .. })`; see
//! [`Error::is_corrupt_state`].

use thiserror::Error;

use crate::api::ApiError;
use crate::codec::CodecError;
use crate::report::BulkFailure;
use crate::resources::{MetadataError, ResourceKind};
use crate::state::StateError;

/// Result type used throughout the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Library error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A resource type's identifier or editable-field metadata is invalid.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// The field is not declared editable for this resource type.
    #[error("Field '{field}' of {kind} is not editable")]
    NotEditable {
        /// Resource type the update targeted
        kind: ResourceKind,
        /// Local field name that was rejected
        field: String,
    },

    /// The resource type does not support this operation.
    #[error("{kind} does not support {operation}")]
    NotSupported {
        /// Resource type
        kind: ResourceKind,
        /// Operation name (`create` or `delete`)
        operation: &'static str,
    },

    /// The remote reported that the resource does not exist.
    #[error("Remote resource not found: {0}")]
    RemoteNotFound(String),

    /// The remote rejected the request because of a conflict.
    #[error("Remote conflict: {0}")]
    RemoteConflict(String),

    /// Any other remote failure, unclassified by the resource layer.
    #[error(transparent)]
    Remote(ApiError),

    /// A polling loop gave up before the resource reached a final state.
    #[error("{kind} {id} did not finish after {attempts} checks")]
    PollTimeout {
        /// Resource type being polled
        kind: ResourceKind,
        /// Resource identifier
        id: String,
        /// Number of checks made
        attempts: u32,
    },

    /// A resource could not be converted to or from its state or wire form.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The state store failed.
    #[error(transparent)]
    State(#[from] StateError),

    /// A bulk operation finished with some entries failing.
    #[error("{operation} failed for {} resource(s): {}", .failures.len(), summarize(.failures))]
    PartialFailure {
        /// Name of the bulk operation
        operation: &'static str,
        /// Entries that failed, with reasons
        failures: Vec<BulkFailure>,
    },
}

impl Error {
    /// Returns `true` for the not-found outcome of a remote call.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RemoteNotFound(_))
    }

    /// Returns `true` if the state file could not be trusted.
    pub fn is_corrupt_state(&self) -> bool {
        matches!(
            self,
            Self::State(StateError::Corrupt { .. } | StateError::VersionMismatch { .. })
        )
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound(message) => Self::RemoteNotFound(message),
            ApiError::Conflict(message) => Self::RemoteConflict(message),
            other => Self::Remote(other),
        }
    }
}

fn summarize(failures: &[BulkFailure]) -> String {
    failures
        .iter()
        .map(|f| f.key.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
