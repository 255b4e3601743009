//
//  devops-state
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `dvs` entry point.
//!
//! Logging goes to stderr and is controlled by `DVS_DEBUG`, which takes an
//! `EnvFilter` directive such as `debug` or `devops_state=trace`.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use devops_state::api::ApiError;
use devops_state::cli::{Cli, Commands};
use devops_state::state::StateError;
use devops_state::{exit_codes, Error};

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code_for(&e));
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("DVS_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::State(cmd) => cmd.run(&cli.global).await,
        Commands::Build(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("dvs version {}", devops_state::VERSION);
            Ok(())
        }
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<Error>() {
        Some(Error::RemoteNotFound(_)) => exit_codes::NOT_FOUND,
        Some(Error::Remote(ApiError::AuthRequired(_) | ApiError::Forbidden(_))) => {
            exit_codes::AUTH_ERROR
        }
        Some(Error::State(_)) => exit_codes::STATE_ERROR,
        Some(Error::PartialFailure { .. }) => exit_codes::PARTIAL_FAILURE,
        Some(_) => exit_codes::ERROR,
        None if err.downcast_ref::<StateError>().is_some() => exit_codes::STATE_ERROR,
        None => exit_codes::ERROR,
    }
}
