//! Deploy reconciler
//!
//! Brings the remote job, and its optional schedule trigger, in line with the
//! local configuration:
//! - Probe the job by name
//! - Publish the script to the configured location
//! - Create the job when absent, update it when present
//! - Create the trigger alongside a new job; for an existing job, update the
//!   trigger if it can be fetched and create it otherwise
//!
//! Each resource sees at most one create-or-update call per deploy.

use glueetl_client::{GlueApi, ScriptStore};
use glueetl_core::{JobConfig, JobDefinition, TriggerConfig, TriggerDefinition};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::GlueEtlError;
use crate::service::prober::probe_job;
use crate::service::publisher::publish_script;

/// What a deploy did to one remote resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAction {
    Created,
    Updated,
}

impl fmt::Display for ResourceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceAction::Created => f.write_str("created"),
            ResourceAction::Updated => f.write_str("updated"),
        }
    }
}

/// Outcome of a successful deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    /// Job name confirmed by the control plane
    pub job_name: String,
    pub job_action: ResourceAction,
    /// Trigger name and action, when a trigger is configured
    pub trigger: Option<(String, ResourceAction)>,
}

/// Create-or-update driver for one job and its trigger
pub struct Reconciler<'a> {
    api: &'a dyn GlueApi,
    store: &'a dyn ScriptStore,
    script_path: PathBuf,
}

impl<'a> Reconciler<'a> {
    /// # Arguments
    /// * `api` - Control plane
    /// * `store` - Object storage receiving the script
    /// * `script_path` - Local script uploaded on every deploy
    pub fn new(
        api: &'a dyn GlueApi,
        store: &'a dyn ScriptStore,
        script_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            api,
            store,
            script_path: script_path.into(),
        }
    }

    /// Reconcile the remote job with `config`
    pub async fn deploy(&self, config: &JobConfig) -> Result<DeployReport, GlueEtlError> {
        let probe = probe_job(self.api, &config.name).await;
        let definition = JobDefinition::from_config(config);

        // The job must never reference a script that is not in place yet
        publish_script(self.store, &config.script_location, &self.script_path).await?;

        let (job_name, job_action) = if probe.deployed {
            if let Some(previous) = probe
                .script_location
                .as_deref()
                .filter(|previous| *previous != config.script_location.as_str())
            {
                debug!(
                    "Script location of {} moves from {} to {}",
                    config.name, previous, config.script_location
                );
            }
            let name = self.update_job(&definition).await?;
            (name, ResourceAction::Updated)
        } else {
            let name = self.create_job(&definition).await?;
            (name, ResourceAction::Created)
        };

        let trigger = match &config.trigger {
            Some(trigger) => {
                let action = self
                    .reconcile_trigger(trigger, &job_name, job_action)
                    .await?;
                Some((trigger.name.clone(), action))
            }
            None => None,
        };

        Ok(DeployReport {
            job_name,
            job_action,
            trigger,
        })
    }

    async fn create_job(&self, definition: &JobDefinition) -> Result<String, GlueEtlError> {
        info!("Creating job {}", definition.name);
        self.api
            .create_job(definition)
            .await
            .map_err(|source| GlueEtlError::Reconciliation {
                action: "create",
                resource: "job",
                name: definition.name.clone(),
                source,
            })
    }

    async fn update_job(&self, definition: &JobDefinition) -> Result<String, GlueEtlError> {
        info!("Updating job {}", definition.name);
        self.api
            .update_job(definition)
            .await
            .map_err(|source| GlueEtlError::Reconciliation {
                action: "update",
                resource: "job",
                name: definition.name.clone(),
                source,
            })
    }

    /// A trigger of a job created in this pass cannot exist yet, so it is
    /// created without a lookup.
    async fn reconcile_trigger(
        &self,
        trigger: &TriggerConfig,
        job_name: &str,
        job_action: ResourceAction,
    ) -> Result<ResourceAction, GlueEtlError> {
        let definition = TriggerDefinition::new(trigger, job_name);

        let exists = match job_action {
            ResourceAction::Created => false,
            ResourceAction::Updated => match self.api.get_trigger(&definition.name).await {
                Ok(_) => true,
                Err(e) => {
                    debug!(
                        "Trigger {} lookup failed, creating it: {}",
                        definition.name, e
                    );
                    false
                }
            },
        };

        if exists {
            info!("Updating trigger {}", definition.name);
            self.api
                .update_trigger(&definition)
                .await
                .map_err(|source| GlueEtlError::Reconciliation {
                    action: "update",
                    resource: "trigger",
                    name: definition.name.clone(),
                    source,
                })?;
            Ok(ResourceAction::Updated)
        } else {
            info!("Creating trigger {}", definition.name);
            self.api
                .create_trigger(&definition)
                .await
                .map_err(|source| GlueEtlError::Reconciliation {
                    action: "create",
                    resource: "trigger",
                    name: definition.name.clone(),
                    source,
                })?;
            Ok(ResourceAction::Created)
        }
    }
}
