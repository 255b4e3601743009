//
//  devops-state
//  state/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # State Store
//!
//! The state file records which remote resources the library created or
//! imported and has not deleted since, together with their last known
//! encoded form.
//!
//! ## File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "resources": {
//!     "Build": {},
//!     "PullRequest": {},
//!     "Repository": {
//!       "3f2a...": {"id": "3f2a...", "name": "web", "size::int": "2048"}
//!     },
//!     "User": {},
//!     "VariableGroup": {}
//!   }
//! }
//! ```
//!
//! Every resource type is always present. A file without a version, or with
//! a different one, is rejected rather than migrated.
//!
//! ## Configuration
//!
//! The store is opened with an explicit [`StateConfig`]. Without a path,
//! tracking is disabled. [`InitMode`] decides whether a missing file is an
//! empty document or an error.
//!
//! ## Submodules
//!
//! - `document`: [`StateDocument`] parsing and rendering
//! - `store`: [`StateStore`] file access and entry bookkeeping
//! - `tracking`: import, reconcile and bulk delete on [`Session`](crate::Session)

mod document;
mod error;
mod store;
mod tracking;

pub use document::{EntryKey, StateDocument, StateEntry, STATE_VERSION};
pub use error::StateError;
pub use store::{InitMode, StateConfig, StateStore};
pub use tracking::Reconciliation;
