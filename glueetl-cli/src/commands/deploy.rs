//! Deploy command handler

use anyhow::{Context, Result};
use colored::*;
use glueetl_client::{AwsGlueClient, GlueApi, S3ScriptStore, ScriptStore, load_sdk_config};
use glueetl_core::JobConfig;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::error::GlueEtlError;
use crate::service::{DeployReport, Reconciler, Reporter, ResourceAction, StdoutReporter};

/// Publish the script and reconcile the job and its trigger
pub async fn handle_deploy(config: &Config) -> Result<()> {
    let job = config.job()?;

    let sdk_config = load_sdk_config(config.region.clone()).await;
    let api = AwsGlueClient::from_sdk_config(&sdk_config);
    let store = S3ScriptStore::from_sdk_config(&sdk_config);

    deploy_job(&api, &store, &job, &config.script_path, &mut StdoutReporter)
        .await
        .with_context(|| format!("Failed to deploy job {}", job.name))?;

    Ok(())
}

async fn deploy_job(
    api: &dyn GlueApi,
    store: &dyn ScriptStore,
    job: &JobConfig,
    script_path: &Path,
    out: &mut dyn Reporter,
) -> Result<DeployReport, GlueEtlError> {
    info!("Deploying job {}", job.name);

    let report = Reconciler::new(api, store, script_path).deploy(job).await?;
    print_report(&report, out);

    Ok(report)
}

fn print_report(report: &DeployReport, out: &mut dyn Reporter) {
    out.line(format!(
        "  {} job {}",
        colorize_action(report.job_action),
        report.job_name.cyan()
    ));

    if let Some((name, action)) = &report.trigger {
        out.line(format!("  {} trigger {}", colorize_action(*action), name.cyan()));
    }

    out.line(
        format!("Deployed {} successfully", report.job_name)
            .green()
            .bold()
            .to_string(),
    );
}

fn colorize_action(action: ResourceAction) -> ColoredString {
    match action {
        ResourceAction::Created => "Created".green(),
        ResourceAction::Updated => "Updated".yellow(),
    }
}
