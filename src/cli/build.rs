//
//  devops-state
//  cli/build.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Build commands
//!
//! ## Examples
//!
//! ```bash
//! # Wait for a build using the [polling] settings
//! dvs build wait 1234
//!
//! # Check every 5 seconds, at most 20 times
//! dvs build wait 1234 --interval 5 --max-attempts 20
//! ```

use std::time::Duration;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::Config;
use crate::output::{format_status, OutputWriter};
use crate::resources::{Build, PollPolicy, Resource};

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct BuildCommand {
    #[command(subcommand)]
    pub command: BuildSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum BuildSubcommand {
    /// Poll a build until it completes
    Wait(WaitArgs),
}

#[derive(Args, Debug)]
pub struct WaitArgs {
    /// Build id
    pub id: i64,

    /// Seconds between checks, overriding [polling] interval_secs
    #[arg(long)]
    pub interval: Option<u64>,

    /// Maximum number of checks, overriding [polling] max_attempts
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

impl WaitArgs {
    fn poll_policy(&self, config: &Config) -> PollPolicy {
        let base = config.poll_policy();
        PollPolicy::new(
            self.interval.map(Duration::from_secs).unwrap_or(base.interval),
            self.max_attempts.unwrap_or(base.max_attempts),
        )
    }
}

impl BuildCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            BuildSubcommand::Wait(args) => self.wait(args, global).await,
        }
    }

    async fn wait(&self, args: &WaitArgs, global: &GlobalOptions) -> Result<()> {
        let writer = global.output();
        let (config, mut session) = global.connect()?;
        let policy = args.poll_policy(&config);

        let mut build = Build::get_by_id(&session, &args.id.to_string()).await?;
        build.wait_for_completion(&mut session, &policy).await?;

        if writer.is_json() {
            writer.write_json(&build)?;
        } else {
            writer.write_success(&format!(
                "Build {} ({}) finished: {}",
                build.id,
                build.build_number,
                format_status(build.result.as_deref().unwrap_or("unknown"), writer.color_enabled())
            ));
        }
        Ok(())
    }
}
