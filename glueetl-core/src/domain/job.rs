//! Job domain types
//!
//! `JobConfig` is the desired state read from the local configuration file.
//! `JobDefinition` and `TriggerDefinition` are the field sets sent to the
//! control plane; both the create and the update path build them through the
//! same constructor so the two paths can never drift apart.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::location::ScriptLocation;

/// Engine version every job is deployed with
pub const GLUE_VERSION: &str = "1.0";

pub const DEFAULT_MAX_CONCURRENT_RUNS: i32 = 1;
pub const DEFAULT_MAX_RETRIES: i32 = 0;
pub const DEFAULT_TIMEOUT: i32 = 28800;
pub const DEFAULT_MAX_CAPACITY: f64 = 10.0;
pub const DEFAULT_COMMAND_NAME: &str = "glueetl";
pub const DEFAULT_PYTHON_VERSION: &str = "3";

/// Desired state of the managed job
///
/// `name` is the join key between the local file and the remote job; it is
/// never changed by a deploy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub role_name: String,
    pub script_location: ScriptLocation,

    #[serde(default = "default_max_concurrent_runs")]
    pub max_concurrent_runs: i32,

    #[serde(default = "default_command_name")]
    pub command_name: String,

    #[serde(default = "default_python_version")]
    pub python_version: String,

    #[serde(default = "default_max_retries")]
    pub max_retries: i32,

    /// Forwarded as-is to the control plane
    #[serde(default = "default_timeout")]
    pub timeout: i32,

    #[serde(default = "default_max_capacity")]
    pub max_capacity: f64,

    #[serde(default)]
    pub connections: Vec<String>,

    /// Defaults that a run may override
    #[serde(default)]
    pub default_arguments: HashMap<String, String>,

    /// Arguments a run can never override
    #[serde(default)]
    pub non_overridable_arguments: HashMap<String, String>,

    #[serde(default)]
    pub tags: HashMap<String, String>,

    #[serde(default)]
    pub trigger: Option<TriggerConfig>,
}

/// Optional schedule bound to the owning job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerConfig {
    pub name: String,

    /// Cron expression, e.g. `cron(5 * * * ? *)`
    pub schedule: String,

    /// Whether a newly created trigger starts active
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_max_concurrent_runs() -> i32 {
    DEFAULT_MAX_CONCURRENT_RUNS
}

fn default_command_name() -> String {
    DEFAULT_COMMAND_NAME.to_string()
}

fn default_python_version() -> String {
    DEFAULT_PYTHON_VERSION.to_string()
}

fn default_max_retries() -> i32 {
    DEFAULT_MAX_RETRIES
}

fn default_timeout() -> i32 {
    DEFAULT_TIMEOUT
}

fn default_max_capacity() -> f64 {
    DEFAULT_MAX_CAPACITY
}

fn default_enabled() -> bool {
    true
}

/// Command block of a job definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCommand {
    pub name: String,
    pub script_location: String,
    pub python_version: String,
}

/// Everything sent on create-job and update-job
#[derive(Debug, Clone, PartialEq)]
pub struct JobDefinition {
    pub name: String,
    pub role: String,
    pub command: JobCommand,
    pub max_concurrent_runs: i32,
    pub connections: Vec<String>,
    pub default_arguments: HashMap<String, String>,
    pub non_overridable_arguments: HashMap<String, String>,
    pub max_retries: i32,
    pub timeout: i32,
    pub max_capacity: f64,
    pub tags: HashMap<String, String>,
    pub glue_version: String,
}

impl JobDefinition {
    pub fn from_config(config: &JobConfig) -> Self {
        Self {
            name: config.name.clone(),
            role: config.role_name.clone(),
            command: JobCommand {
                name: config.command_name.clone(),
                script_location: config.script_location.as_str().to_string(),
                python_version: config.python_version.clone(),
            },
            max_concurrent_runs: config.max_concurrent_runs,
            connections: config.connections.clone(),
            default_arguments: config.default_arguments.clone(),
            non_overridable_arguments: config.non_overridable_arguments.clone(),
            max_retries: config.max_retries,
            timeout: config.timeout,
            max_capacity: config.max_capacity,
            tags: config.tags.clone(),
            glue_version: GLUE_VERSION.to_string(),
        }
    }
}

/// Everything sent on create-trigger and update-trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerDefinition {
    pub name: String,
    pub schedule: String,
    /// The single job this trigger starts
    pub job_name: String,
    pub start_on_creation: bool,
}

impl TriggerDefinition {
    pub fn new(trigger: &TriggerConfig, job_name: &str) -> Self {
        Self {
            name: trigger.name.clone(),
            schedule: trigger.schedule.clone(),
            job_name: job_name.to_string(),
            start_on_creation: trigger.enabled,
        }
    }
}

/// Outcome of asking the control plane whether a job exists
///
/// Transient; produced by the prober and consumed once by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProbeResult {
    pub name: String,
    pub deployed: bool,
    pub script_location: Option<String>,
}

impl JobProbeResult {
    pub fn absent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deployed: false,
            script_location: None,
        }
    }

    pub fn present(name: impl Into<String>, script_location: Option<String>) -> Self {
        Self {
            name: name.into(),
            deployed: true,
            script_location,
        }
    }
}
