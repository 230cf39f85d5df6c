// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config file discovery for the CLI.
//!
//! Precedence: `--config`, then `MJ_CONFIG`, then `<config dir>/mj/mj.toml`.
//! An explicitly named file must exist; the default location is optional.

use anyhow::{Context, Result};
use mj_engine::Config;
use std::path::{Path, PathBuf};

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mj").join("mj.toml"))
}

/// Load the supervisor config with environment overrides applied.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let named = explicit.map(Path::to_path_buf).or_else(mj_engine::env::config_path);
    let config = match named {
        Some(path) => Config::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load_or_default(default_path().as_deref())?,
    };
    Ok(config.apply_env())
}
