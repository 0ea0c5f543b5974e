//! Run domain types

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// State of a job run as reported by the control plane
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobRunState {
    Starting,
    Running,
    Stopping,
    Stopped,
    Succeeded,
    Failed,
    Timeout,
    Error,
    Waiting,
    Expired,
    /// A state this build does not know about yet
    Unknown(String),
}

impl JobRunState {
    /// Parse the remote wire spelling (`RUNNING`, `SUCCEEDED`, ...)
    pub fn from_wire(value: &str) -> Self {
        match value {
            "STARTING" => Self::Starting,
            "RUNNING" => Self::Running,
            "STOPPING" => Self::Stopping,
            "STOPPED" => Self::Stopped,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "TIMEOUT" => Self::Timeout,
            "ERROR" => Self::Error,
            "WAITING" => Self::Waiting,
            "EXPIRED" => Self::Expired,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::Starting => "STARTING",
            Self::Running => "RUNNING",
            Self::Stopping => "STOPPING",
            Self::Stopped => "STOPPED",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Timeout => "TIMEOUT",
            Self::Error => "ERROR",
            Self::Waiting => "WAITING",
            Self::Expired => "EXPIRED",
            Self::Unknown(other) => other,
        }
    }

    /// Whether the run can no longer change state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Stopped
                | Self::Succeeded
                | Self::Failed
                | Self::Timeout
                | Self::Error
                | Self::Expired
        )
    }
}

impl fmt::Display for JobRunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Latest observed status of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStatus {
    pub state: JobRunState,
    pub error_message: Option<String>,
}

impl RunStatus {
    pub fn new(state: JobRunState) -> Self {
        Self {
            state,
            error_message: None,
        }
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// A run argument that is not `key=value`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentParseError {
    #[error("invalid run argument `{0}`: expected key=value")]
    MissingSeparator(String),

    #[error("invalid run argument `{0}`: key is empty")]
    EmptyKey(String),
}

/// Parse `key=value` run arguments into a mapping.
///
/// Splits on the first `=` only, so values may themselves contain `=`.
/// Later duplicates of a key win.
pub fn parse_run_arguments<S: AsRef<str>>(
    args: &[S],
) -> Result<HashMap<String, String>, ArgumentParseError> {
    let mut arguments = HashMap::with_capacity(args.len());

    for arg in args {
        let arg = arg.as_ref();
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| ArgumentParseError::MissingSeparator(arg.to_string()))?;

        if key.is_empty() {
            return Err(ArgumentParseError::EmptyKey(arg.to_string()));
        }

        arguments.insert(key.to_string(), value.to_string());
    }

    Ok(arguments)
}
