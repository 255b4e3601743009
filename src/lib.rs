//
//  devops-state
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # devops-state
//!
//! A client for an Azure DevOps-style REST API that remembers which remote
//! resources it manages in a local JSON state file.
//!
//! ## Overview
//!
//! Resources are typed Rust structs with a static table of field metadata:
//! one identifier field and a set of editable fields, each with an optional
//! wire name. A tagged codec turns them into flat string maps for the state
//! file and back. On top of that sit create/read/update/delete against the
//! remote, state bookkeeping, reconciliation against live data and pushing
//! local edits back.
//!
//! ## Module Structure
//!
//! - [`api`]: the [`Transport`](api::Transport) seam and its HTTP client
//! - [`auth`]: access-token credentials
//! - [`codec`]: tagged attribute maps
//! - [`resources`]: the [`Resource`] contract and concrete resource types
//! - [`state`]: the state file and tracking operations
//! - [`reconcile`]: refresh and push
//! - [`session`]: transport, scope and state bundled per caller
//! - [`config`]: the TOML configuration file
//! - [`cli`] and [`output`]: the `dvs` binary
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use devops_state::api::DevOpsClient;
//! use devops_state::auth::AuthCredential;
//! use devops_state::resources::{CreateRepository, Repository, Resource};
//! use devops_state::state::{InitMode, StateConfig, StateStore};
//! use devops_state::{Scope, Session};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let client = DevOpsClient::new("https://dev.azure.com/contoso")?
//!     .with_auth(AuthCredential::personal_access_token("my-pat"));
//! let state = StateStore::open(StateConfig::at("state.json", InitMode::CreateIfMissing));
//! let mut session = Session::new(Box::new(client), Scope::new("web"), state)?;
//!
//! let mut repo = Repository::create(&mut session, &CreateRepository::new("api")).await?;
//! repo.update(&mut session, "name", "api-v2".into()).await?;
//! Repository::delete_by_id(&mut session, &repo.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;

pub mod auth;

pub mod cli;

pub mod codec;

pub mod config;

pub mod error;

pub mod output;

pub mod reconcile;

pub mod report;

pub mod resources;

pub mod session;

pub mod state;

#[cfg(test)]
mod testing;

pub use cli::Cli;
pub use config::Config;
pub use error::{Error, Result};
pub use resources::{AnyResource, Resource, ResourceKind};
pub use session::{Scope, Session};

/// Name of the binary, also used for configuration paths.
pub const APP_NAME: &str = "dvs";

/// Crate version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process exit codes of `dvs`.
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource and state issues
/// - `16+`: Bulk operation issues
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;

    pub const ERROR: i32 = 1;

    /// Invalid arguments; clap exits with this code itself.
    pub const USAGE: i32 = 2;

    /// The remote rejected the credentials.
    pub const AUTH_ERROR: i32 = 4;

    /// A remote resource does not exist.
    pub const NOT_FOUND: i32 = 8;

    /// The state file is missing, corrupt or of another version.
    pub const STATE_ERROR: i32 = 9;

    /// A bulk operation finished with some entries failing.
    pub const PARTIAL_FAILURE: i32 = 16;
}
