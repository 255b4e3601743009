//
//  devops-state
//  cli/state.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! State file commands
//!
//! `wipe` and `show` work offline. The other commands talk to the remote
//! and need an organization URL, a project and usually `DVS_TOKEN`.
//!
//! ## Examples
//!
//! ```bash
//! # Start from an empty state file
//! dvs state wipe
//!
//! # Track an existing repository
//! dvs state import Repository 3f2a9c1e-...
//!
//! # Pull live values into the file
//! dvs state refresh
//!
//! # Push edited editable fields back
//! dvs state push
//!
//! # Delete every tracked build
//! dvs state delete-all --kind Build --yes
//! ```

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use serde_json::{json, Value};

use crate::output::{format_status, truncate, OutputWriter, TableBuilder};
use crate::reconcile::{push_state_to_live, refresh_state};
use crate::resources::ResourceKind;
use crate::state::{EntryKey, StateEntry};
use crate::Error;

use super::GlobalOptions;

/// Fields tried, in order, for the NAME column of `state show`.
const LABEL_FIELDS: [&str; 4] = ["name", "title", "display_name", "build_number"];

#[derive(Args, Debug)]
pub struct StateCommand {
    #[command(subcommand)]
    pub command: StateSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum StateSubcommand {
    /// Replace the state file with an empty document
    Wipe,

    /// List tracked resources
    #[command(visible_alias = "ls")]
    Show(ShowArgs),

    /// Start tracking an existing remote resource
    Import(ImportArgs),

    /// Overwrite tracked entries with their live form
    Refresh,

    /// Apply stored editable fields to the live resources
    Push,

    /// Delete every tracked remote resource
    DeleteAll(DeleteAllArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Only show this resource type
    #[arg(long, short = 'k')]
    pub kind: Option<ResourceKind>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Resource type, e.g. Repository
    pub kind: ResourceKind,

    /// Remote identifier
    pub id: String,
}

#[derive(Args, Debug)]
pub struct DeleteAllArgs {
    /// Only delete this resource type
    #[arg(long, short = 'k')]
    pub kind: Option<ResourceKind>,

    /// Confirm the deletion
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl StateCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            StateSubcommand::Wipe => self.wipe(global),
            StateSubcommand::Show(args) => self.show(args, global),
            StateSubcommand::Import(args) => self.import(args, global).await,
            StateSubcommand::Refresh => self.refresh(global).await,
            StateSubcommand::Push => self.push(global).await,
            StateSubcommand::DeleteAll(args) => self.delete_all(args, global).await,
        }
    }

    fn wipe(&self, global: &GlobalOptions) -> Result<()> {
        let writer = global.output();
        let config = global.load_config()?;
        let mut store = global.state_store(&config)?;
        store.wipe()?;

        let path = store
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        if writer.is_json() {
            writer.write_json(&json!({ "wiped": path }))?;
        } else {
            writer.write_success(&format!("Wiped state file {}", path));
        }
        Ok(())
    }

    fn show(&self, args: &ShowArgs, global: &GlobalOptions) -> Result<()> {
        let writer = global.output();
        let config = global.load_config()?;
        let document = global.state_store(&config)?.load()?;

        if writer.is_json() {
            return match args.kind {
                Some(kind) => writer.write_json(document.entries(kind)),
                None => {
                    println!("{}", document.to_json_pretty()?);
                    Ok(())
                }
            };
        }

        let rows: Vec<Vec<String>> = document
            .iter()
            .filter(|(key, _)| args.kind.map_or(true, |k| k == key.kind))
            .map(|(key, entry)| {
                vec![
                    key.kind.to_string(),
                    truncate(&key.id, 40),
                    entry_label(entry).unwrap_or_default(),
                    format_status(
                        string_field(entry, "status").unwrap_or_default(),
                        writer.color_enabled(),
                    ),
                ]
            })
            .collect();

        if rows.is_empty() {
            writer.write_info("No tracked resources");
            return Ok(());
        }

        TableBuilder::new()
            .color(writer.color_enabled())
            .headers(["TYPE", "ID", "NAME", "STATUS"])
            .rows(rows)
            .print();
        Ok(())
    }

    async fn import(&self, args: &ImportArgs, global: &GlobalOptions) -> Result<()> {
        let writer = global.output();
        let mut session = global.session()?;
        let resource = session.import_resource(args.kind, &args.id).await?;
        let key = EntryKey::new(args.kind, resource.id()?);

        if writer.is_json() {
            writer.write_json(&json!({ "key": key, "entry": resource.to_state() }))?;
        } else {
            writer.write_success(&format!("Imported {}", key));
        }
        Ok(())
    }

    async fn refresh(&self, global: &GlobalOptions) -> Result<()> {
        let writer = global.output();
        let mut session = global.session()?;
        let reconciliation = refresh_state(&mut session).await?;

        if writer.is_json() {
            writer.write_json(&json!({
                "changed": reconciliation.changed,
                "failures": reconciliation.failures,
            }))?;
        } else if reconciliation.changed.is_empty() {
            writer.write_info("State already matches the remote");
        } else {
            for key in &reconciliation.changed {
                writer.write_success(&format!("Refreshed {}", key));
            }
        }

        if reconciliation.failures.is_empty() {
            Ok(())
        } else {
            Err(Error::PartialFailure {
                operation: "refresh",
                failures: reconciliation.failures,
            }
            .into())
        }
    }

    async fn push(&self, global: &GlobalOptions) -> Result<()> {
        let writer = global.output();
        let mut session = global.session()?;
        let report = push_state_to_live(&mut session).await?;

        if writer.is_json() {
            writer.write_json(&report)?;
        } else {
            for applied in &report.applied {
                writer.write_success(&format!(
                    "Updated {} ({})",
                    applied.key,
                    applied.fields.join(", ")
                ));
            }
            for key in &report.skipped {
                writer.write_warning(&format!(
                    "{} differs only in fields that cannot be edited",
                    key
                ));
            }
            if report.applied.is_empty() && report.failed.is_empty() {
                writer.write_info("Nothing to push");
            }
        }

        if report.is_success() {
            Ok(())
        } else {
            Err(Error::PartialFailure {
                operation: "push",
                failures: report.failed,
            }
            .into())
        }
    }

    async fn delete_all(&self, args: &DeleteAllArgs, global: &GlobalOptions) -> Result<()> {
        if !args.yes {
            bail!("Refusing to delete tracked resources without --yes");
        }

        let writer = global.output();
        let mut session = global.session()?;
        let report = session.delete_all(args.kind).await?;

        if writer.is_json() {
            writer.write_json(&report)?;
        } else {
            for key in &report.succeeded {
                writer.write_success(&format!("Deleted {}", key));
            }
            if report.succeeded.is_empty() && report.failed.is_empty() {
                writer.write_info("No tracked resources");
            }
        }

        report.into_result("delete-all")?;
        Ok(())
    }
}

fn string_field<'a>(entry: &'a StateEntry, field: &str) -> Option<&'a str> {
    entry.get(field).and_then(Value::as_str)
}

/// Human-readable name of a tracked entry.
fn entry_label(entry: &StateEntry) -> Option<String> {
    LABEL_FIELDS
        .iter()
        .find_map(|field| string_field(entry, field))
        .map(|label| truncate(label, 50))
}
