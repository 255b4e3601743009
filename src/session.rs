//
//  devops-state
//  session.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Session
//!
//! A [`Session`] bundles what every resource operation needs: the transport
//! to the remote, the project the operation is scoped to, and the state store
//! that records what the library is tracking.
//!
//! ```rust,no_run
//! use devops_state::api::DevOpsClient;
//! use devops_state::auth::AuthCredential;
//! use devops_state::state::{InitMode, StateConfig, StateStore};
//! use devops_state::{Scope, Session};
//!
//! let client = DevOpsClient::new("https://dev.azure.com/contoso")?
//!     .with_auth(AuthCredential::personal_access_token("my-pat"));
//! let state = StateStore::open(StateConfig::at("state.json", InitMode::CreateIfMissing));
//! let session = Session::new(Box::new(client), Scope::new("web"), state)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::api::Transport;
use crate::resources::Registry;
use crate::state::StateStore;
use crate::Result;

/// The project requests are scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Project name or id, used verbatim in request paths
    pub project: String,
}

impl Scope {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
        }
    }
}

/// Transport, scope and state store for a sequence of operations.
pub struct Session {
    transport: Box<dyn Transport>,
    scope: Scope,
    state: StateStore,
}

impl Session {
    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Metadata`] if a resource type's metadata is
    /// invalid, so such errors surface before the first remote call.
    pub fn new(transport: Box<dyn Transport>, scope: Scope, state: StateStore) -> Result<Self> {
        Registry::global()?;
        Ok(Self {
            transport,
            scope,
            state,
        })
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut StateStore {
        &mut self.state
    }
}
