//
//  devops-state
//  state/tracking.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! State operations that need the remote: import, reconcile, bulk delete.

use tracing::{info, warn};

use super::{EntryKey, StateDocument};
use crate::report::{BulkFailure, BulkReport};
use crate::resources::{AnyResource, ResourceKind};
use crate::session::Session;
use crate::Result;

/// Result of comparing every tracked entry with its live resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// The stored document with every changed entry replaced by its live form
    pub snapshot: StateDocument,
    /// Entries whose live form differed from the stored one
    pub changed: Vec<EntryKey>,
    /// Entries whose live resource could not be fetched; left as stored
    pub failures: Vec<BulkFailure>,
}

impl Reconciliation {
    pub fn is_clean(&self) -> bool {
        self.changed.is_empty() && self.failures.is_empty()
    }
}

impl Session {
    /// Starts tracking an existing remote resource.
    pub async fn import_resource(&mut self, kind: ResourceKind, id: &str) -> Result<AnyResource> {
        let live = kind.fetch(self, id).await?;
        let live_id = live.id()?;
        self.state_mut().add(kind, &live_id, live.to_state())?;
        info!("Imported {}/{}", kind, live_id);
        Ok(live)
    }

    /// Fetches every tracked resource and builds the latest observed document.
    ///
    /// Entries whose live form matches the stored one are left untouched.
    /// Nothing is persisted; see [`crate::reconcile::refresh_state`].
    ///
    /// With tracking disabled there is nothing to compare, and the call fails
    /// with [`StateError::NotConfigured`](super::StateError::NotConfigured)
    /// before any remote request.
    pub async fn reconcile(&self) -> Result<Reconciliation> {
        let stored = self.state().load()?;
        let mut snapshot = stored.clone();
        let mut changed = Vec::new();
        let mut failures = Vec::new();

        for (key, entry) in stored.iter() {
            match key.kind.fetch(self, &key.id).await {
                Ok(live) => {
                    let live_entry = live.to_state();
                    if live_entry != *entry {
                        snapshot.insert(key.kind, &key.id, live_entry);
                        changed.push(key);
                    }
                }
                Err(e) => {
                    warn!("Could not fetch {}: {}", key, e);
                    failures.push(BulkFailure::new(key, &e));
                }
            }
        }

        Ok(Reconciliation {
            snapshot,
            changed,
            failures,
        })
    }

    /// Deletes every tracked resource, optionally of one type only.
    ///
    /// Failures are collected and do not stop the remaining deletions.
    ///
    /// With tracking disabled the set of managed resources is unknown, and the
    /// call fails with [`StateError::NotConfigured`](super::StateError::NotConfigured)
    /// without deleting anything.
    pub async fn delete_all(&mut self, filter: Option<ResourceKind>) -> Result<BulkReport> {
        let keys = self.state().load()?.keys(filter);
        let mut report = BulkReport::default();

        for key in keys {
            match key.kind.delete(self, &key.id).await {
                Ok(()) => report.succeeded.push(key),
                Err(e) => {
                    warn!("Could not delete {}: {}", key, e);
                    report.failed.push(BulkFailure::new(key, &e));
                }
            }
        }

        info!(
            "Deleted {} resource(s), {} failed",
            report.succeeded.len(),
            report.failed.len()
        );
        Ok(report)
    }
}
