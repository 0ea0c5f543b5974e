//! Cancellation bridge
//!
//! Turns an interrupt (Ctrl+C) or termination request into a cancelled
//! token that the run monitor observes between polls, and issues the
//! best-effort stop of the run recorded in the [`RunSession`].

use colored::*;
use glueetl_client::GlueApi;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::service::Reporter;
use crate::session::RunSession;

/// Exit status after an interrupt or termination request
pub const CANCELLED_EXIT_CODE: u8 = 130;

/// Bridge between process signals and the active run
pub struct CancellationBridge {
    session: Arc<RunSession>,
    token: CancellationToken,
}

impl CancellationBridge {
    /// Start listening for interrupt and termination requests.
    ///
    /// Install only once the run id is recorded: a request arriving before
    /// that has nothing to stop and keeps the default process behavior.
    /// A second request while the stop is in flight exits immediately.
    pub fn install(session: Arc<RunSession>) -> Self {
        let token = CancellationToken::new();
        let listener = token.clone();

        tokio::spawn(async move {
            if listen(listener, shutdown_signal).await {
                std::process::exit(i32::from(CANCELLED_EXIT_CODE));
            }
        });

        Self::with_token(session, token)
    }

    /// Bridge driven by an externally owned token instead of process signals
    pub fn with_token(session: Arc<RunSession>, token: CancellationToken) -> Self {
        Self { session, token }
    }

    /// Resolves once cancellation has been requested
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Ask the control plane to stop the recorded run.
    ///
    /// Fire-and-forget: failures are reported line by line and never
    /// returned, and nothing waits for the run to actually stop.
    pub async fn stop_active_run(&self, api: &dyn GlueApi, out: &mut dyn Reporter) {
        let Some(run) = self.session.active() else {
            out.line(format!("{}", "No active run to stop".yellow()));
            return;
        };

        info!("Stopping run {} of job {}", run.run_id, run.job_name);

        let run_ids = [run.run_id.clone()];
        match api.batch_stop_job_run(&run.job_name, &run_ids).await {
            Ok(report) if report.errors.is_empty() => {
                out.line(format!(
                    "{} JobRunId {} of {}",
                    "Stopping".yellow().bold(),
                    run.run_id.cyan(),
                    run.job_name
                ));
            }
            Ok(report) => {
                for error in report.errors {
                    out.line(format!(
                        "  {} {}: {} ({})",
                        "Failed to stop".red(),
                        error.job_run_id.as_deref().unwrap_or(&run.run_id),
                        error.message.as_deref().unwrap_or("unknown error"),
                        error.code.as_deref().unwrap_or("unknown code")
                    ));
                }
            }
            Err(e) => {
                warn!("Stop request for run {} failed: {}", run.run_id, e);
                out.line(format!(
                    "  {} {}: {}",
                    "Failed to stop".red(),
                    run.run_id,
                    e
                ));
            }
        }
    }
}

/// Cancel `token` on the first request from `next_request`.
///
/// Returns `true` once a second request arrives, and `false` if the token
/// was cancelled by someone else before any request.
async fn listen<F, Fut>(token: CancellationToken, mut next_request: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    tokio::select! {
        _ = next_request() => {
            info!("Cancellation requested");
            token.cancel();
        }
        _ = token.cancelled() => return false,
    }

    next_request().await;
    warn!("Cancellation requested again, exiting without waiting for the stop request");
    true
}

/// Resolves on Ctrl+C or, on unix, SIGTERM
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {}
        _ = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::{Call, FakeGlue};
    use glueetl_client::StopRunError;
    use std::pin::Pin;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn bridge_for(job_name: &str, run_id: &str) -> CancellationBridge {
        let session = Arc::new(RunSession::new());
        session.record(job_name, run_id);
        CancellationBridge::with_token(session, CancellationToken::new())
    }

    #[tokio::test]
    async fn test_stop_targets_recorded_run() {
        let api = FakeGlue::new();
        let bridge = bridge_for("j", "r123");
        let mut out = Vec::new();

        bridge.stop_active_run(&api, &mut out).await;

        assert_eq!(
            api.calls(),
            vec![Call::BatchStopJobRun(
                "j".to_string(),
                vec!["r123".to_string()]
            )]
        );
        assert_eq!(out.len(), 1);
        assert!(out[0].contains("r123"));
    }

    #[tokio::test]
    async fn test_stop_without_session_makes_no_call() {
        let api = FakeGlue::new();
        let bridge =
            CancellationBridge::with_token(Arc::new(RunSession::new()), CancellationToken::new());
        let mut out = Vec::new();

        bridge.stop_active_run(&api, &mut out).await;

        assert!(api.calls().is_empty());
        assert!(out[0].contains("No active run"));
    }

    #[tokio::test]
    async fn test_stop_reports_each_error() {
        let api = FakeGlue::new();
        api.state.lock().unwrap().stop_errors = vec![StopRunError {
            job_run_id: Some("r123".to_string()),
            code: Some("InvalidInputException".to_string()),
            message: Some("run already finished".to_string()),
        }];
        let bridge = bridge_for("j", "r123");
        let mut out = Vec::new();

        bridge.stop_active_run(&api, &mut out).await;

        assert_eq!(out.len(), 1);
        assert!(out[0].contains("run already finished"));
        assert!(out[0].contains("InvalidInputException"));
    }

    #[tokio::test]
    async fn test_stop_call_failure_is_reported_not_raised() {
        let api = FakeGlue::new();
        api.state.lock().unwrap().stop_call_fails = true;
        let bridge = bridge_for("j", "r123");
        let mut out = Vec::new();

        bridge.stop_active_run(&api, &mut out).await;

        assert_eq!(out.len(), 1);
        assert!(out[0].contains("unavailable"));
    }

    fn notified(notify: &Arc<Notify>) -> impl FnMut() -> Pin<Box<dyn Future<Output = ()> + Send>> + use<> {
        let notify = Arc::clone(notify);
        move || {
            let notify = Arc::clone(&notify);
            Box::pin(async move { notify.notified().await })
        }
    }

    #[tokio::test]
    async fn test_second_request_escalates() {
        let token = CancellationToken::new();
        let requests = Arc::new(Notify::new());
        let listener = tokio::spawn(listen(token.clone(), notified(&requests)));

        requests.notify_one();
        tokio::time::timeout(Duration::from_secs(1), token.cancelled())
            .await
            .unwrap();
        assert!(!listener.is_finished());

        requests.notify_one();
        let escalated = tokio::time::timeout(Duration::from_secs(1), listener)
            .await
            .unwrap()
            .unwrap();
        assert!(escalated);
    }

    #[tokio::test]
    async fn test_listener_ends_when_cancelled_elsewhere() {
        let token = CancellationToken::new();
        let requests = Arc::new(Notify::new());
        let listener = tokio::spawn(listen(token.clone(), notified(&requests)));

        token.cancel();
        let escalated = tokio::time::timeout(Duration::from_secs(1), listener)
            .await
            .unwrap()
            .unwrap();
        assert!(!escalated);
    }

    #[tokio::test]
    async fn test_with_token_observes_external_cancel() {
        let token = CancellationToken::new();
        let bridge = CancellationBridge::with_token(Arc::new(RunSession::new()), token.clone());

        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), bridge.cancelled())
            .await
            .unwrap();
    }
}
