//! Run launcher and monitor
//!
//! Starts a run of the job, records it in the [`RunSession`], then polls its
//! status on a fixed interval until it reaches a terminal state or the
//! cancellation bridge fires.

use colored::*;
use glueetl_client::GlueApi;
use glueetl_core::{JobRunState, RunStatus};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::GlueEtlError;
use crate::service::Reporter;
use crate::service::cancellation::CancellationBridge;
use crate::session::{ActiveRun, RunSession};

/// Default time between two status fetches
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// How monitoring ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run reached this terminal state
    Finished(JobRunState),
    /// Cancellation was requested and a stop was issued
    Cancelled,
}

/// Starts runs and records them in the session
pub struct RunLauncher<'a> {
    api: &'a dyn GlueApi,
    session: Arc<RunSession>,
}

impl<'a> RunLauncher<'a> {
    pub fn new(api: &'a dyn GlueApi, session: Arc<RunSession>) -> Self {
        Self { api, session }
    }

    /// Start a run of `job_name` with `arguments`
    pub async fn launch(
        &self,
        job_name: &str,
        arguments: &HashMap<String, String>,
        out: &mut dyn Reporter,
    ) -> Result<ActiveRun, GlueEtlError> {
        info!(
            "Starting run of job {} with {} argument(s)",
            job_name,
            arguments.len()
        );

        let run_id = self
            .api
            .start_job_run(job_name, arguments)
            .await
            .map_err(|source| GlueEtlError::Launch {
                job_name: job_name.to_string(),
                source,
            })?;

        if !self.session.record(job_name, &run_id) {
            warn!("A run was already recorded; keeping the first one");
        }

        out.line(format!("JobName: {}", job_name.bold()));
        out.line(format!("  JobRunId: {}", run_id.cyan()));

        Ok(ActiveRun {
            job_name: job_name.to_string(),
            run_id,
        })
    }
}

/// Polls one run until it is terminal or cancelled
pub struct RunMonitor<'a> {
    api: &'a dyn GlueApi,
    bridge: &'a CancellationBridge,
    poll_interval: Duration,
}

impl<'a> RunMonitor<'a> {
    pub fn new(api: &'a dyn GlueApi, bridge: &'a CancellationBridge, poll_interval: Duration) -> Self {
        Self {
            api,
            bridge,
            poll_interval,
        }
    }

    /// Poll `run` until it finishes.
    ///
    /// A status that has been fetched is always printed before cancellation
    /// is acted on. Fetch errors end monitoring; they are not retried.
    pub async fn watch(
        &self,
        run: &ActiveRun,
        out: &mut dyn Reporter,
    ) -> Result<RunOutcome, GlueEtlError> {
        loop {
            let fetched = tokio::select! {
                biased;
                _ = self.bridge.cancelled() => None,
                status = self.api.get_job_run(&run.job_name, &run.run_id) => Some(status),
            };

            let Some(fetched) = fetched else {
                return Ok(self.cancel(out).await);
            };

            let status = fetched.map_err(|source| GlueEtlError::MonitorFetch {
                job_name: run.job_name.clone(),
                run_id: run.run_id.clone(),
                source,
            })?;

            debug!("Run {} is {}", run.run_id, status.state);
            print_status(&status, out);

            if status.state.is_terminal() {
                return Ok(RunOutcome::Finished(status.state));
            }

            let cancelled = tokio::select! {
                biased;
                _ = self.bridge.cancelled() => true,
                _ = tokio::time::sleep(self.poll_interval) => false,
            };

            if cancelled {
                return Ok(self.cancel(out).await);
            }
        }
    }

    async fn cancel(&self, out: &mut dyn Reporter) -> RunOutcome {
        self.bridge.stop_active_run(self.api, out).await;
        RunOutcome::Cancelled
    }
}

fn print_status(status: &RunStatus, out: &mut dyn Reporter) {
    out.line(format!("  JobRunState: {}", colorize_state(&status.state)));
    if let Some(message) = &status.error_message {
        out.line(format!("  ErrorMessage: {}", message.red()));
    }
}

/// Colorize run state for display
fn colorize_state(state: &JobRunState) -> ColoredString {
    let label = state.as_wire();
    match state {
        JobRunState::Succeeded => label.green(),
        JobRunState::Failed | JobRunState::Error | JobRunState::Timeout => label.red(),
        JobRunState::Stopped | JobRunState::Stopping | JobRunState::Expired => label.dimmed(),
        JobRunState::Running => label.cyan(),
        _ => label.yellow(),
    }
}
