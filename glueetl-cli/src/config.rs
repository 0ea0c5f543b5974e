//! Configuration module
//!
//! Handles CLI configuration: where the job config and script live, and
//! which region the remote clients talk to.

use anyhow::{Context, Result};
use glueetl_core::{JobConfig, load_config};
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the YAML job configuration
    pub config_path: PathBuf,
    /// Path of the local job script uploaded on deploy
    pub script_path: PathBuf,
    /// Region override; the ambient AWS environment decides when unset
    pub region: Option<String>,
}

impl Config {
    /// Load and validate the job configuration
    pub fn job(&self) -> Result<JobConfig> {
        load_config(&self.config_path).with_context(|| {
            format!(
                "Failed to load job configuration from {}",
                self.config_path.display()
            )
        })
    }
}
