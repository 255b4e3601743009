//
//  devops-state
//  reconcile.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Reconciler
//!
//! Brings the state file and the live resources back into agreement, in
//! either direction.
//!
//! | Function | Direction | Remote writes |
//! |----------|-----------|---------------|
//! | [`refresh_state`] | live -> state | none |
//! | [`push_state_to_live`] | state -> live | one PATCH per differing editable field |
//!
//! ## Pushing
//!
//! For each tracked resource whose live form differs from the stored one:
//!
//! 1. [`diff_entries`] lists the editable fields whose stored value differs,
//!    in the order they appear in the stored entry.
//! 2. The resource is rebuilt from its live form and updated once per field,
//!    in that order.
//! 3. Once every field is applied, the entry is rewritten with the result.
//!
//! Resources are independent. If one field of a resource fails, the
//! remaining fields of that resource are skipped, its stored entry is put
//! back, and the next resource is processed.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::codec::{decode_entry, split_key, AttrValue};
use crate::report::BulkFailure;
use crate::resources::{Registry, ResourceKind};
use crate::session::Session;
use crate::state::{EntryKey, Reconciliation, StateEntry};
use crate::Result;

/// One editable field whose stored value differs from the live one.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// Local field name
    pub field: &'static str,
    /// Stored value, to be applied to the live resource
    pub value: AttrValue,
}

/// Fields pushed to one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedChanges {
    pub key: EntryKey,
    pub fields: Vec<&'static str>,
}

/// Outcome of [`push_state_to_live`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PushReport {
    /// Resources that were updated, with the fields applied
    pub applied: Vec<AppliedChanges>,
    /// Resources whose live form differs only in fields that cannot be edited
    pub skipped: Vec<EntryKey>,
    /// Resources that could not be fetched or updated
    pub failed: Vec<BulkFailure>,
}

impl PushReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of remote updates made.
    pub fn update_count(&self) -> usize {
        self.applied.iter().map(|a| a.fields.len()).sum()
    }
}

/// Lists the editable fields whose value in `stored` differs from `live`.
///
/// Keys are compared by base name, so a field that changed kind (for example
/// `description::none` against `description`) counts as different. Fields
/// absent from `stored` are ignored.
pub fn diff_entries(kind: ResourceKind, stored: &StateEntry, live: &StateEntry) -> Result<Vec<FieldChange>> {
    let editable = Registry::global()?.editable_fields(kind)?;
    let live_by_base: HashMap<&str, (&str, &Value)> = live
        .iter()
        .map(|(key, value)| (split_key(key).0, (key.as_str(), value)))
        .collect();

    let mut changes = Vec::new();
    for (key, value) in stored {
        let (base, _) = split_key(key);
        let Some(field) = editable.local_name(base) else {
            continue;
        };

        let unchanged = matches!(
            live_by_base.get(base),
            Some((live_key, live_value)) if *live_key == key.as_str() && *live_value == value
        );
        if !unchanged {
            let (_, decoded) = decode_entry(key, value)?;
            changes.push(FieldChange {
                field,
                value: decoded,
            });
        }
    }
    Ok(changes)
}

/// Reconciles and persists the latest observed state.
///
/// The file is only rewritten when at least one entry changed.
pub async fn refresh_state(session: &mut Session) -> Result<Reconciliation> {
    let reconciliation = session.reconcile().await?;
    if reconciliation.changed.is_empty() {
        debug!("State already matches live resources");
    } else {
        session.state().write(&reconciliation.snapshot)?;
        info!("Refreshed {} state entries", reconciliation.changed.len());
    }
    Ok(reconciliation)
}

/// Applies the stored value of every differing editable field to the live
/// resources.
pub async fn push_state_to_live(session: &mut Session) -> Result<PushReport> {
    let Reconciliation {
        snapshot,
        changed,
        failures,
    } = session.reconcile().await?;
    let stored = session.state().load()?;

    let mut report = PushReport {
        failed: failures,
        ..PushReport::default()
    };

    for key in changed {
        let (Some(stored_entry), Some(live_entry)) =
            (stored.get(key.kind, &key.id), snapshot.get(key.kind, &key.id))
        else {
            continue;
        };

        match push_entry(session, &key, stored_entry, live_entry).await {
            Ok(fields) if fields.is_empty() => {
                debug!("{} differs only in fields that cannot be edited", key);
                report.skipped.push(key);
            }
            Ok(fields) => report.applied.push(AppliedChanges { key, fields }),
            Err(e) => {
                warn!("Could not push {}: {}", key, e);
                if let Err(restore) = session
                    .state_mut()
                    .update(key.kind, &key.id, stored_entry.clone())
                {
                    warn!("Could not restore stored entry {}: {}", key, restore);
                }
                report.failed.push(BulkFailure::new(key, &e));
            }
        }
    }

    Ok(report)
}

async fn push_entry(
    session: &mut Session,
    key: &EntryKey,
    stored: &StateEntry,
    live: &StateEntry,
) -> Result<Vec<&'static str>> {
    let changes = diff_entries(key.kind, stored, live)?;
    if changes.is_empty() {
        return Ok(Vec::new());
    }

    let mut resource = key.kind.decode_state(live)?;
    let mut applied = Vec::with_capacity(changes.len());
    for change in changes {
        if let Err(e) = resource.update_field(session, change.field, change.value).await {
            debug!("{} field '{}' was not applied", key, change.field);
            return Err(e);
        }
        applied.push(change.field);
    }

    session
        .state_mut()
        .update(key.kind, &resource.id()?, resource.to_state())?;
    info!("Pushed {} field(s) to {}", applied.len(), key);
    Ok(applied)
}
