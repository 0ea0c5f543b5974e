//! glueetl core
//!
//! Core types for the glueetl deploy and run tool.
//!
//! This crate contains:
//! - Domain types: job and trigger configuration, remote definitions, run state
//! - Config: loading and validating the declarative job file

pub mod config;
pub mod domain;

pub use config::{ConfigError, load_config, parse_config};
pub use domain::job::{
    JobCommand, JobConfig, JobDefinition, JobProbeResult, TriggerConfig, TriggerDefinition,
};
pub use domain::location::{LocationError, ScriptLocation};
pub use domain::run::{ArgumentParseError, JobRunState, RunStatus, parse_run_arguments};
