//
//  devops-state
//  state/error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the state store.
#[derive(Error, Debug)]
pub enum StateError {
    /// State tracking is disabled; there is no file to read or write.
    #[error("State tracking is not configured (no state file path)")]
    NotConfigured,

    /// The file exists but is not a valid state document.
    #[error("State file {} is corrupt: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// The file was written by an incompatible version, or carries no version.
    #[error(
        "State file {} has version {}, expected {expected}",
        .path.display(),
        .found.map(|v| v.to_string()).unwrap_or_else(|| "none".to_string())
    )]
    VersionMismatch {
        path: PathBuf,
        found: Option<u64>,
        expected: u32,
    },

    /// The file does not exist and the store may not create it.
    #[error("State file {} does not exist (run `dvs state wipe` to create it)", .0.display())]
    Missing(PathBuf),

    #[error("State file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
