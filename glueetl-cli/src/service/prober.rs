//! Job existence prober

use glueetl_client::GlueApi;
use glueetl_core::JobProbeResult;
use tracing::debug;

/// Ask the control plane whether `name` is deployed.
///
/// Never fails: a missing job and a failed lookup both come back as not
/// deployed, which sends the caller down the create path.
pub async fn probe_job(api: &dyn GlueApi, name: &str) -> JobProbeResult {
    match api.get_job(name).await {
        Ok(job) if job.name == name => {
            debug!("Job {} is deployed", name);
            JobProbeResult::present(name, job.script_location)
        }
        Ok(job) => {
            debug!(
                "Lookup of job {} returned job {}, treating as not deployed",
                name, job.name
            );
            JobProbeResult::absent(name)
        }
        Err(e) if e.is_not_found() => {
            debug!("Job {} is not deployed", name);
            JobProbeResult::absent(name)
        }
        Err(e) => {
            debug!("Lookup of job {} failed, treating as not deployed: {}", name, e);
            JobProbeResult::absent(name)
        }
    }
}
