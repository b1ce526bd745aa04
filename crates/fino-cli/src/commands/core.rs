//! Shared utilities for commands
//!
//! This module contains:
//! - `load_config` - Resolve config (file override, defaults, environment)
//! - `open_engine` - Build the engine from config
//! - `require_user` - Check the `--user` flag

use std::path::Path;

use anyhow::{bail, Context, Result};
use fino_core::{FinoConfig, HttpBudgetEngine};

pub fn load_config(path: Option<&Path>) -> Result<FinoConfig> {
    FinoConfig::load(path).context("Failed to load configuration")
}

/// Engine talking to the configured budget API and categorizer
pub fn open_engine(config: &FinoConfig) -> Result<HttpBudgetEngine> {
    HttpBudgetEngine::from_config(config).context("Failed to set up budget engine")
}

pub fn require_user(user: Option<&str>) -> Result<&str> {
    match user.map(str::trim) {
        Some(user) if !user.is_empty() => Ok(user),
        _ => bail!("No user given. Pass --user <id>"),
    }
}
