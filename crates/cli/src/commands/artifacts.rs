// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mj report` / `mj logs` - print a job's summary report or download log

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use mj_engine::{log_tail, Config, DownloadManager, ManagerError};

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Job name
    pub name: String,

    /// Download home directory (default from config)
    #[arg(long)]
    pub home_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Job name
    pub name: String,

    /// Only print the last N lines
    #[arg(short = 'n', long)]
    pub lines: Option<usize>,

    /// Download home directory (default from config)
    #[arg(long)]
    pub home_dir: Option<PathBuf>,
}

fn home(config: &Config, explicit: Option<&Path>) -> PathBuf {
    explicit.map(Path::to_path_buf).unwrap_or_else(|| config.defaults.home_dir.clone())
}

pub fn report(config: Config, args: &ReportArgs) -> Result<()> {
    let home = home(&config, args.home_dir.as_deref());
    let manager = DownloadManager::new(config.manager, config.defaults);
    print!("{}", manager.read_report(&home, &args.name)?);
    Ok(())
}

pub fn logs(config: Config, args: &LogsArgs) -> Result<()> {
    let home = home(&config, args.home_dir.as_deref());
    let Some(n) = args.lines else {
        let manager = DownloadManager::new(config.manager, config.defaults);
        print!("{}", manager.read_log(&home, &args.name)?);
        return Ok(());
    };

    let path = mj_core::launch::log_path(&home, &args.name);
    if !path.is_file() {
        return Err(ManagerError::ArtifactNotFound(path).into());
    }
    for line in log_tail::tail_lines(&path, n) {
        println!("{line}");
    }
    Ok(())
}
