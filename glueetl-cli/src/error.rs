//! Error taxonomy of the deploy and run flows
//!
//! Probe failures never appear here: the prober collapses them into "not
//! deployed". Stop-run failures are reported per run id and never escalate.

use glueetl_client::ClientError;
use glueetl_core::{ArgumentParseError, ConfigError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlueEtlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Script upload failed; no job mutation has been attempted
    #[error("failed to publish script to {location}: {source}")]
    ObjectStore {
        location: String,
        #[source]
        source: ClientError,
    },

    /// The control plane rejected a create or update
    #[error("failed to {action} {resource} `{name}`: {source}")]
    Reconciliation {
        action: &'static str,
        resource: &'static str,
        name: String,
        #[source]
        source: ClientError,
    },

    #[error(transparent)]
    ArgumentParse(#[from] ArgumentParseError),

    #[error("failed to start a run of job `{job_name}`: {source}")]
    Launch {
        job_name: String,
        #[source]
        source: ClientError,
    },

    /// Status fetch failed while polling; monitoring stops
    #[error("failed to fetch status of run {run_id} of job `{job_name}`: {source}")]
    MonitorFetch {
        job_name: String,
        run_id: String,
        #[source]
        source: ClientError,
    },
}
