//! In-memory fakes of the remote collaborators

use async_trait::async_trait;
use glueetl_client::{
    ClientError, GlueApi, RemoteJob, RemoteTrigger, Result, ScriptStore, StopRunError,
    StopRunReport,
};
use glueetl_core::{JobDefinition, JobRunState, RunStatus, ScriptLocation, TriggerDefinition};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Every call made against [`FakeGlue`], in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetJob(String),
    CreateJob(String),
    UpdateJob(String),
    StartJobRun(String, HashMap<String, String>),
    GetJobRun(String, String),
    BatchStopJobRun(String, Vec<String>),
    GetTrigger(String),
    CreateTrigger(String),
    UpdateTrigger(String),
}

/// How `get_job` fails for a job that is not stored
#[derive(Debug, Clone, Copy, Default)]
pub enum ProbeFailure {
    #[default]
    NotFound,
    AccessDenied,
}

#[derive(Default)]
pub struct FakeState {
    pub jobs: HashMap<String, JobDefinition>,
    pub triggers: HashMap<String, TriggerDefinition>,
    pub calls: Vec<Call>,
    pub probe_failure: ProbeFailure,
    /// Fail every `get_job`, even for stored jobs
    pub probe_always_fails: bool,
    pub reject_job_writes: bool,
    /// Fail every `get_trigger` with AccessDenied, even for stored triggers
    pub trigger_lookup_fails: bool,
    /// Statuses returned by successive polls; `RUNNING` once exhausted
    pub run_statuses: VecDeque<Result<RunStatus>>,
    pub stop_errors: Vec<StopRunError>,
    pub stop_call_fails: bool,
    /// Cancel the token once this many polls have been answered
    pub cancel_after_polls: Option<(usize, CancellationToken)>,
    pub polls: usize,
}

/// HashMap-backed control plane recording every call
#[derive(Default)]
pub struct FakeGlue {
    pub state: Mutex<FakeState>,
}

impl FakeGlue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job(self, definition: JobDefinition) -> Self {
        self.state
            .lock()
            .unwrap()
            .jobs
            .insert(definition.name.clone(), definition);
        self
    }

    pub fn with_trigger(self, definition: TriggerDefinition) -> Self {
        self.state
            .lock()
            .unwrap()
            .triggers
            .insert(definition.name.clone(), definition);
        self
    }

    pub fn with_run_states(self, states: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for wire in states {
                state
                    .run_statuses
                    .push_back(Ok(RunStatus::new(JobRunState::from_wire(wire))));
            }
        }
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| matches(call)).count()
    }
}

#[async_trait]
impl GlueApi for FakeGlue {
    async fn get_job(&self, name: &str) -> Result<RemoteJob> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetJob(name.to_string()));

        let stored = state.jobs.get(name).map(|job| RemoteJob {
            name: job.name.clone(),
            script_location: Some(job.command.script_location.clone()),
        });

        match (stored, state.probe_always_fails) {
            (Some(job), false) => Ok(job),
            _ => Err(match state.probe_failure {
                ProbeFailure::NotFound => ClientError::NotFound(format!("job {name}")),
                ProbeFailure::AccessDenied => {
                    ClientError::service("GetJob", "AccessDeniedException", "denied")
                }
            }),
        }
    }

    async fn create_job(&self, definition: &JobDefinition) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateJob(definition.name.clone()));

        if state.reject_job_writes {
            return Err(ClientError::service("CreateJob", "InvalidInputException", "rejected"));
        }
        if state.jobs.contains_key(&definition.name) {
            return Err(ClientError::service(
                "CreateJob",
                "AlreadyExistsException",
                "job exists",
            ));
        }

        state.jobs.insert(definition.name.clone(), definition.clone());
        Ok(definition.name.clone())
    }

    async fn update_job(&self, definition: &JobDefinition) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::UpdateJob(definition.name.clone()));

        if state.reject_job_writes {
            return Err(ClientError::service("UpdateJob", "InvalidInputException", "rejected"));
        }
        if !state.jobs.contains_key(&definition.name) {
            return Err(ClientError::NotFound(format!("job {}", definition.name)));
        }

        state.jobs.insert(definition.name.clone(), definition.clone());
        Ok(definition.name.clone())
    }

    async fn start_job_run(
        &self,
        job_name: &str,
        arguments: &HashMap<String, String>,
    ) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(Call::StartJobRun(job_name.to_string(), arguments.clone()));
        Ok("jr_0001".to_string())
    }

    async fn get_job_run(&self, job_name: &str, run_id: &str) -> Result<RunStatus> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(Call::GetJobRun(job_name.to_string(), run_id.to_string()));
        state.polls += 1;

        if let Some((after, token)) = &state.cancel_after_polls {
            if state.polls >= *after {
                token.cancel();
            }
        }

        state
            .run_statuses
            .pop_front()
            .unwrap_or_else(|| Ok(RunStatus::new(JobRunState::Running)))
    }

    async fn batch_stop_job_run(
        &self,
        job_name: &str,
        run_ids: &[String],
    ) -> Result<StopRunReport> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(Call::BatchStopJobRun(job_name.to_string(), run_ids.to_vec()));

        if state.stop_call_fails {
            return Err(ClientError::service(
                "BatchStopJobRun",
                "InternalServiceException",
                "unavailable",
            ));
        }

        if state.stop_errors.is_empty() {
            Ok(StopRunReport {
                submitted: run_ids.to_vec(),
                errors: Vec::new(),
            })
        } else {
            Ok(StopRunReport {
                submitted: Vec::new(),
                errors: state.stop_errors.clone(),
            })
        }
    }

    async fn get_trigger(&self, name: &str) -> Result<RemoteTrigger> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetTrigger(name.to_string()));

        if state.trigger_lookup_fails {
            return Err(ClientError::service(
                "GetTrigger",
                "AccessDeniedException",
                "denied",
            ));
        }

        state
            .triggers
            .get(name)
            .map(|trigger| RemoteTrigger {
                name: trigger.name.clone(),
                schedule: Some(trigger.schedule.clone()),
            })
            .ok_or_else(|| ClientError::NotFound(format!("trigger {name}")))
    }

    async fn create_trigger(&self, definition: &TriggerDefinition) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateTrigger(definition.name.clone()));
        state
            .triggers
            .insert(definition.name.clone(), definition.clone());
        Ok(definition.name.clone())
    }

    async fn update_trigger(&self, definition: &TriggerDefinition) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::UpdateTrigger(definition.name.clone()));
        state
            .triggers
            .insert(definition.name.clone(), definition.clone());
        Ok(definition.name.clone())
    }
}

/// Script store keeping the latest body per location
#[derive(Default)]
pub struct FakeStore {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    pub uploads: Mutex<usize>,
    pub fail: bool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn object(&self, uri: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(uri).cloned()
    }

    pub fn upload_count(&self) -> usize {
        *self.uploads.lock().unwrap()
    }
}

#[async_trait]
impl ScriptStore for FakeStore {
    async fn upload(&self, location: &ScriptLocation, body: Vec<u8>) -> Result<()> {
        *self.uploads.lock().unwrap() += 1;
        if self.fail {
            return Err(ClientError::ObjectStore("bucket unreachable".to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(location.as_str().to_string(), body);
        Ok(())
    }
}
