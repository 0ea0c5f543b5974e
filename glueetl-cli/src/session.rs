//! Run session
//!
//! The job name and run id of the run this process launched. Written once by
//! the launcher and read by the cancellation bridge, which may observe it from
//! another task; a reader sees either nothing or the complete pair.

use std::sync::OnceLock;

/// The run this process is watching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRun {
    pub job_name: String,
    pub run_id: String,
}

/// Single-assignment cell holding the active run
#[derive(Debug, Default)]
pub struct RunSession {
    active: OnceLock<ActiveRun>,
}

impl RunSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the launched run
    ///
    /// Returns `false` and leaves the session untouched if a run was
    /// already recorded.
    pub fn record(&self, job_name: impl Into<String>, run_id: impl Into<String>) -> bool {
        self.active
            .set(ActiveRun {
                job_name: job_name.into(),
                run_id: run_id.into(),
            })
            .is_ok()
    }

    pub fn active(&self) -> Option<&ActiveRun> {
        self.active.get()
    }
}
