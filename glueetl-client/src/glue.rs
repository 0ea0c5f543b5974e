//! Control-plane client backed by the AWS Glue SDK

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_glue::Client;
use aws_sdk_glue::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_glue::types::{
    Action, ConnectionsList, ExecutionProperty, JobCommand, JobUpdate, TriggerType, TriggerUpdate,
};
use glueetl_core::{JobDefinition, JobRunState, RunStatus, TriggerDefinition};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::sdk::load_sdk_config;
use crate::{GlueApi, RemoteJob, RemoteTrigger, StopRunError, StopRunReport};

const NOT_FOUND_CODE: &str = "EntityNotFoundException";

/// [`GlueApi`] over the AWS SDK
#[derive(Debug, Clone)]
pub struct AwsGlueClient {
    client: Client,
}

impl AwsGlueClient {
    /// Wrap an already configured SDK client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from an already resolved AWS environment
    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self::new(Client::new(sdk_config))
    }

    /// Build a client from the ambient AWS environment
    ///
    /// # Arguments
    /// * `region` - Overrides the region resolved from the environment
    pub async fn from_env(region: Option<String>) -> Self {
        Self::from_sdk_config(&load_sdk_config(region).await)
    }
}

/// Collapse an SDK error into a [`ClientError`], keeping the remote code
fn map_sdk_error<E>(operation: &'static str, err: SdkError<E>) -> ClientError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let code = err.code().unwrap_or("Unknown").to_string();
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

    if code == NOT_FOUND_CODE {
        ClientError::NotFound(format!("{operation}: {message}"))
    } else {
        ClientError::service(operation, code, message)
    }
}

fn job_command(definition: &JobDefinition) -> JobCommand {
    JobCommand::builder()
        .name(&definition.command.name)
        .script_location(&definition.command.script_location)
        .python_version(&definition.command.python_version)
        .build()
}

fn execution_property(definition: &JobDefinition) -> ExecutionProperty {
    ExecutionProperty::builder()
        .max_concurrent_runs(definition.max_concurrent_runs)
        .build()
}

fn connections(definition: &JobDefinition) -> ConnectionsList {
    ConnectionsList::builder()
        .set_connections(Some(definition.connections.clone()))
        .build()
}

fn trigger_action(definition: &TriggerDefinition) -> Action {
    Action::builder().job_name(&definition.job_name).build()
}

#[async_trait]
impl GlueApi for AwsGlueClient {
    async fn get_job(&self, name: &str) -> Result<RemoteJob> {
        let output = self
            .client
            .get_job()
            .job_name(name)
            .send()
            .await
            .map_err(|e| map_sdk_error("GetJob", e))?;

        let job = output
            .job()
            .ok_or_else(|| ClientError::NotFound(format!("job {name}")))?;

        Ok(RemoteJob {
            name: job.name().unwrap_or_default().to_string(),
            script_location: job
                .command()
                .and_then(|command| command.script_location())
                .map(str::to_string),
        })
    }

    async fn create_job(&self, definition: &JobDefinition) -> Result<String> {
        debug!("CreateJob {}", definition.name);

        let output = self
            .client
            .create_job()
            .name(&definition.name)
            .role(&definition.role)
            .execution_property(execution_property(definition))
            .command(job_command(definition))
            .connections(connections(definition))
            .set_default_arguments(Some(definition.default_arguments.clone()))
            .set_non_overridable_arguments(Some(definition.non_overridable_arguments.clone()))
            .max_retries(definition.max_retries)
            .timeout(definition.timeout)
            .max_capacity(definition.max_capacity)
            .set_tags(Some(definition.tags.clone()))
            .glue_version(&definition.glue_version)
            .send()
            .await
            .map_err(|e| map_sdk_error("CreateJob", e))?;

        output
            .name()
            .map(str::to_string)
            .ok_or(ClientError::MissingField {
                operation: "CreateJob",
                field: "Name",
            })
    }

    async fn update_job(&self, definition: &JobDefinition) -> Result<String> {
        debug!("UpdateJob {}", definition.name);

        // JobUpdate carries no tags; tags stay as they were at creation
        let update = JobUpdate::builder()
            .role(&definition.role)
            .execution_property(execution_property(definition))
            .command(job_command(definition))
            .connections(connections(definition))
            .set_default_arguments(Some(definition.default_arguments.clone()))
            .set_non_overridable_arguments(Some(definition.non_overridable_arguments.clone()))
            .max_retries(definition.max_retries)
            .timeout(definition.timeout)
            .max_capacity(definition.max_capacity)
            .glue_version(&definition.glue_version)
            .build();

        let output = self
            .client
            .update_job()
            .job_name(&definition.name)
            .job_update(update)
            .send()
            .await
            .map_err(|e| map_sdk_error("UpdateJob", e))?;

        output
            .job_name()
            .map(str::to_string)
            .ok_or(ClientError::MissingField {
                operation: "UpdateJob",
                field: "JobName",
            })
    }

    async fn start_job_run(
        &self,
        job_name: &str,
        arguments: &HashMap<String, String>,
    ) -> Result<String> {
        let output = self
            .client
            .start_job_run()
            .job_name(job_name)
            .set_arguments(Some(arguments.clone()))
            .send()
            .await
            .map_err(|e| map_sdk_error("StartJobRun", e))?;

        output
            .job_run_id()
            .map(str::to_string)
            .ok_or(ClientError::MissingField {
                operation: "StartJobRun",
                field: "JobRunId",
            })
    }

    async fn get_job_run(&self, job_name: &str, run_id: &str) -> Result<RunStatus> {
        let output = self
            .client
            .get_job_run()
            .job_name(job_name)
            .run_id(run_id)
            .send()
            .await
            .map_err(|e| map_sdk_error("GetJobRun", e))?;

        let run = output.job_run().ok_or(ClientError::MissingField {
            operation: "GetJobRun",
            field: "JobRun",
        })?;

        let state = run
            .job_run_state()
            .map(|state| JobRunState::from_wire(state.as_str()))
            .ok_or(ClientError::MissingField {
                operation: "GetJobRun",
                field: "JobRunState",
            })?;

        Ok(RunStatus {
            state,
            error_message: run.error_message().map(str::to_string),
        })
    }

    async fn batch_stop_job_run(
        &self,
        job_name: &str,
        run_ids: &[String],
    ) -> Result<StopRunReport> {
        let output = self
            .client
            .batch_stop_job_run()
            .job_name(job_name)
            .set_job_run_ids(Some(run_ids.to_vec()))
            .send()
            .await
            .map_err(|e| map_sdk_error("BatchStopJobRun", e))?;

        let submitted = output
            .successful_submissions()
            .iter()
            .filter_map(|submission| submission.job_run_id().map(str::to_string))
            .collect();

        let errors = output
            .errors()
            .iter()
            .map(|error| StopRunError {
                job_run_id: error.job_run_id().map(str::to_string),
                code: error
                    .error_detail()
                    .and_then(|detail| detail.error_code())
                    .map(str::to_string),
                message: error
                    .error_detail()
                    .and_then(|detail| detail.error_message())
                    .map(str::to_string),
            })
            .collect();

        Ok(StopRunReport { submitted, errors })
    }

    async fn get_trigger(&self, name: &str) -> Result<RemoteTrigger> {
        let output = self
            .client
            .get_trigger()
            .name(name)
            .send()
            .await
            .map_err(|e| map_sdk_error("GetTrigger", e))?;

        let trigger = output
            .trigger()
            .ok_or_else(|| ClientError::NotFound(format!("trigger {name}")))?;

        Ok(RemoteTrigger {
            name: trigger.name().unwrap_or(name).to_string(),
            schedule: trigger.schedule().map(str::to_string),
        })
    }

    async fn create_trigger(&self, definition: &TriggerDefinition) -> Result<String> {
        debug!("CreateTrigger {}", definition.name);

        let output = self
            .client
            .create_trigger()
            .name(&definition.name)
            .r#type(TriggerType::Scheduled)
            .schedule(&definition.schedule)
            .actions(trigger_action(definition))
            .start_on_creation(definition.start_on_creation)
            .send()
            .await
            .map_err(|e| map_sdk_error("CreateTrigger", e))?;

        Ok(output.name().unwrap_or(&definition.name).to_string())
    }

    async fn update_trigger(&self, definition: &TriggerDefinition) -> Result<String> {
        debug!("UpdateTrigger {}", definition.name);

        let update = TriggerUpdate::builder()
            .schedule(&definition.schedule)
            .actions(trigger_action(definition))
            .build();

        let output = self
            .client
            .update_trigger()
            .name(&definition.name)
            .trigger_update(update)
            .send()
            .await
            .map_err(|e| map_sdk_error("UpdateTrigger", e))?;

        Ok(output
            .trigger()
            .and_then(|trigger| trigger.name())
            .unwrap_or(&definition.name)
            .to_string())
    }
}
