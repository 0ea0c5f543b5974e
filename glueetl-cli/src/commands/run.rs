//! Run command handler
//!
//! Launches one run of the configured job and follows it. Arguments are
//! parsed before any remote call so a malformed one costs nothing.

use anyhow::{Context, Result};
use glueetl_client::{AwsGlueClient, GlueApi};
use glueetl_core::parse_run_arguments;
use std::collections::HashMap;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::GlueEtlError;
use crate::service::{
    CANCELLED_EXIT_CODE, CancellationBridge, Reporter, RunLauncher, RunMonitor, RunOutcome,
    StdoutReporter,
};
use crate::session::RunSession;

/// Start a run with `args` and poll it every `poll_interval` seconds
pub async fn handle_run(config: &Config, args: &[String], poll_interval: u64) -> Result<ExitCode> {
    let arguments = parse_run_arguments(args).map_err(GlueEtlError::from)?;
    let job = config.job()?;

    let api = AwsGlueClient::from_env(config.region.clone()).await;

    let outcome = run_job(
        &api,
        &job.name,
        &arguments,
        Duration::from_secs(poll_interval),
        CancellationBridge::install,
        &mut StdoutReporter,
    )
    .await
    .with_context(|| format!("Run of job {} failed", job.name))?;

    Ok(ExitCode::from(exit_status(&outcome)))
}

/// Launch, then watch until terminal or cancelled.
///
/// `install` receives the session only after the run id is recorded.
async fn run_job(
    api: &dyn GlueApi,
    job_name: &str,
    arguments: &HashMap<String, String>,
    poll_interval: Duration,
    install: impl FnOnce(Arc<RunSession>) -> CancellationBridge,
    out: &mut dyn Reporter,
) -> Result<RunOutcome, GlueEtlError> {
    let session = Arc::new(RunSession::new());

    let run = RunLauncher::new(api, Arc::clone(&session))
        .launch(job_name, arguments, out)
        .await?;

    let bridge = install(session);

    RunMonitor::new(api, &bridge, poll_interval)
        .watch(&run, out)
        .await
}

fn exit_status(outcome: &RunOutcome) -> u8 {
    match outcome {
        RunOutcome::Finished(_) => 0,
        RunOutcome::Cancelled => CANCELLED_EXIT_CODE,
    }
}
