//
//  devops-state
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod build;
mod state;

pub use build::BuildCommand;
pub use state::StateCommand;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::api::DevOpsClient;
use crate::auth::{AuthCredential, TOKEN_ENV};
use crate::config::Config;
use crate::output::{OutputFormat, OutputWriter};
use crate::session::{Scope, Session};
use crate::state::StateStore;

/// `dvs` command line.
#[derive(Parser, Debug)]
#[command(
    name = "dvs",
    version,
    about = "Track and reconcile Azure DevOps resources from the command line",
    long_about = "dvs keeps a local state file of the remote resources it manages.\n\n\
                  It can import existing resources, refresh the file from the remote, \
                  push local edits back and delete everything it tracks.",
    propagate_version = true,
    after_help = "Use 'dvs <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Options accepted by every command.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Configuration file to use instead of the default location
    #[arg(long, global = true, env = "DVS_CONFIG")]
    pub config: Option<PathBuf>,

    /// State file path
    #[arg(long, global = true, env = "DVS_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Organization URL, e.g. https://dev.azure.com/contoso
    #[arg(long, global = true, env = "DVS_ORG_URL")]
    pub org_url: Option<String>,

    /// Project requests are scoped to
    #[arg(long, short = 'p', global = true, env = "DVS_PROJECT")]
    pub project: Option<String>,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect and manage the state file
    #[command(visible_alias = "st")]
    State(StateCommand),

    /// Follow builds
    Build(BuildCommand),

    /// Print the version
    Version,
}

impl GlobalOptions {
    pub fn output(&self) -> OutputWriter {
        OutputWriter::new(if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        })
    }

    /// Loads the configuration from `--config` or the default location.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    /// Opens the state store without touching the remote.
    pub fn state_store(&self, config: &Config) -> Result<StateStore> {
        let state = config.state_config(self.state_file.as_deref())?;
        Ok(StateStore::open(state))
    }

    /// Builds a session against the configured organization and project.
    pub fn session(&self) -> Result<Session> {
        self.connect().map(|(_, session)| session)
    }

    /// Like [`session`](Self::session), also returning the loaded configuration.
    pub fn connect(&self) -> Result<(Config, Session)> {
        let config = self.load_config()?;

        let org_url = self
            .org_url
            .clone()
            .or_else(|| config.remote.organization_url.clone())
            .context("No organization URL configured. Use --org-url or set [remote] organization_url")?;
        let project = self
            .project
            .clone()
            .or_else(|| config.remote.project.clone())
            .context("No project configured. Use --project or set [remote] project")?;

        let mut client = DevOpsClient::new(&org_url)
            .with_context(|| format!("Invalid organization URL: {}", org_url))?;
        if let Some(version) = &config.remote.api_version {
            client = client.with_api_version(version.clone());
        }
        match AuthCredential::from_env(config.remote.username.as_deref()) {
            Some(auth) => client = client.with_auth(auth),
            None => warn!("{} is not set; requests are unauthenticated", TOKEN_ENV),
        }

        let state = self.state_store(&config)?;
        let session = Session::new(Box::new(client), Scope::new(project), state)?;
        Ok((config, session))
    }
}
