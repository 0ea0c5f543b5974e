//! Job configuration file
//!
//! Loads the declarative YAML file whose single top-level key `job` holds the
//! desired state of the managed job, then validates it.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::job::JobConfig;
use crate::domain::location::LocationError;

/// Scheme every script location must use
pub const SCRIPT_SCHEME: &str = "s3";

/// Errors raised while loading the job configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("config has no top-level `job` key")]
    MissingJob,

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Location(#[from] LocationError),
}

#[derive(Deserialize)]
struct ConfigFile {
    job: Option<JobConfig>,
}

/// Read, parse and validate the job configuration at `path`
pub fn load_config(path: impl AsRef<Path>) -> Result<JobConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config(&content)
}

/// Parse and validate job configuration from YAML text
pub fn parse_config(content: &str) -> Result<JobConfig, ConfigError> {
    let file: ConfigFile = serde_yaml::from_str(content)?;
    let job = file.job.ok_or(ConfigError::MissingJob)?;
    job.validate()?;
    Ok(job)
}

impl JobConfig {
    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("job.name cannot be empty".to_string()));
        }

        if self.role_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "job.role_name cannot be empty".to_string(),
            ));
        }

        self.script_location.require_scheme(SCRIPT_SCHEME)?;

        if self.command_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "job.command_name cannot be empty".to_string(),
            ));
        }

        if self.max_concurrent_runs < 1 {
            return Err(ConfigError::Invalid(
                "job.max_concurrent_runs must be at least 1".to_string(),
            ));
        }

        if self.max_retries < 0 {
            return Err(ConfigError::Invalid(
                "job.max_retries cannot be negative".to_string(),
            ));
        }

        if self.timeout < 1 {
            return Err(ConfigError::Invalid(
                "job.timeout must be greater than 0".to_string(),
            ));
        }

        if self.max_capacity.is_nan() || self.max_capacity <= 0.0 {
            return Err(ConfigError::Invalid(
                "job.max_capacity must be greater than 0".to_string(),
            ));
        }

        if let Some(trigger) = &self.trigger {
            if trigger.name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "job.trigger.name cannot be empty".to_string(),
                ));
            }
            if trigger.schedule.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "job.trigger.schedule cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
