// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mj: launch container-image mirroring jobs and supervise them to completion

mod color;
mod commands;
mod config;
mod exit_error;
mod logging;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::artifacts::{LogsArgs, ReportArgs};
use commands::run::{JobArgs, RunMode};
use exit_error::ExitError;

#[derive(Parser)]
#[command(name = "mj", about = "Supervise container-image mirroring jobs", styles = color::styles())]
struct Cli {
    /// Config file (default: $MJ_CONFIG, then <config dir>/mj/mj.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Launch a mirroring job and follow it until it finishes
    Run {
        #[command(flatten)]
        job: JobArgs,

        /// Ask the script to list what it would mirror without copying
        #[arg(long)]
        dry_run: bool,
    },
    /// Relaunch a job with --retry, resuming the script's earlier progress
    Retry {
        #[command(flatten)]
        job: JobArgs,
    },
    /// Print the summary report of a job
    Report(ReportArgs),
    /// Print the download log of a job
    Logs(LogsArgs),
}

impl Command {
    /// Home directory whose state dir receives the supervisor log.
    fn supervised_home(&self, config: &mj_engine::Config) -> Option<PathBuf> {
        match self {
            Self::Run { job, .. } | Self::Retry { job } => {
                Some(job.home_dir.clone().unwrap_or_else(|| config.defaults.home_dir.clone()))
            }
            Self::Report(_) | Self::Logs(_) => None,
        }
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::load(cli.config.as_deref())?;
    let _guard = logging::init(cli.command.supervised_home(&config).as_deref());

    match &cli.command {
        Command::Run { job, dry_run } => {
            commands::run::handle(config, job, RunMode::Fresh { dry_run: *dry_run }).await
        }
        Command::Retry { job } => commands::run::handle(config, job, RunMode::Retry).await,
        Command::Report(args) => commands::artifacts::report(config, args),
        Command::Logs(args) => commands::artifacts::logs(config, args),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = dispatch(cli).await {
        let code = match e.downcast_ref::<ExitError>() {
            Some(exit) => {
                eprintln!("mj: {exit}");
                exit.code
            }
            None => {
                eprintln!("mj: {e:#}");
                1
            }
        };
        std::process::exit(code);
    }
}
