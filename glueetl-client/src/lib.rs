//! glueetl client
//!
//! The two remote collaborators of the deploy and run flows, each behind a
//! trait so the flows can be exercised against fakes:
//! - [`GlueApi`]: the job, job-run and trigger operations of the control plane
//! - [`ScriptStore`]: single-object upload of the job script
//!
//! Production implementations are [`AwsGlueClient`] and [`S3ScriptStore`].
//! Both are built from one [`load_sdk_config`] result, so they share the same
//! credentials and region.

pub mod error;
mod glue;
mod sdk;
mod storage;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use glue::AwsGlueClient;
pub use sdk::load_sdk_config;
pub use storage::S3ScriptStore;

use async_trait::async_trait;
use glueetl_core::{JobDefinition, RunStatus, ScriptLocation, TriggerDefinition};
use std::collections::HashMap;

/// A job as seen by the control plane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteJob {
    pub name: String,
    pub script_location: Option<String>,
}

/// A trigger as seen by the control plane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTrigger {
    pub name: String,
    pub schedule: Option<String>,
}

/// Per-run failure inside a batch stop response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopRunError {
    pub job_run_id: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Response of a batch stop request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopRunReport {
    /// Run ids the service accepted for stopping
    pub submitted: Vec<String>,
    pub errors: Vec<StopRunError>,
}

/// Control-plane operations consumed by deploy and run
///
/// Lookups return [`ClientError::NotFound`] for missing resources. Create and
/// update calls return the name the service confirmed.
#[async_trait]
pub trait GlueApi: Send + Sync {
    async fn get_job(&self, name: &str) -> Result<RemoteJob>;

    async fn create_job(&self, definition: &JobDefinition) -> Result<String>;

    async fn update_job(&self, definition: &JobDefinition) -> Result<String>;

    /// Start a run and return its run id
    async fn start_job_run(
        &self,
        job_name: &str,
        arguments: &HashMap<String, String>,
    ) -> Result<String>;

    async fn get_job_run(&self, job_name: &str, run_id: &str) -> Result<RunStatus>;

    async fn batch_stop_job_run(&self, job_name: &str, run_ids: &[String])
    -> Result<StopRunReport>;

    async fn get_trigger(&self, name: &str) -> Result<RemoteTrigger>;

    async fn create_trigger(&self, definition: &TriggerDefinition) -> Result<String>;

    async fn update_trigger(&self, definition: &TriggerDefinition) -> Result<String>;
}

/// Object storage holding job scripts
#[async_trait]
pub trait ScriptStore: Send + Sync {
    /// Write `body` to `location`, replacing any existing object
    async fn upload(&self, location: &ScriptLocation, body: Vec<u8>) -> Result<()>;
}
