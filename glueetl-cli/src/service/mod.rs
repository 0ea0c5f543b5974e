//! Service layer
//!
//! The deploy and run flows. Services talk to the remote collaborators only
//! through the `GlueApi` and `ScriptStore` traits, and write user-facing
//! progress through a [`Reporter`], so every flow can be driven by fakes.

mod cancellation;
mod monitor;
mod prober;
mod publisher;
mod reconciler;

#[cfg(test)]
pub(crate) mod testing;

pub use cancellation::{CANCELLED_EXIT_CODE, CancellationBridge};
pub use monitor::{DEFAULT_POLL_INTERVAL, RunLauncher, RunMonitor, RunOutcome};
pub use reconciler::{DeployReport, Reconciler, ResourceAction};

/// Destination for user-facing progress lines
pub trait Reporter {
    fn line(&mut self, line: String);
}

/// Prints each line to stdout
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn line(&mut self, line: String) {
        println!("{}", line);
    }
}

impl Reporter for Vec<String> {
    fn line(&mut self, line: String) {
        self.push(line);
    }
}
