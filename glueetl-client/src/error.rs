//! Error types for the glueetl client

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the control plane or object storage
#[derive(Debug, Error)]
pub enum ClientError {
    /// The named resource does not exist remotely
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The control plane rejected or failed a call
    #[error("{operation} failed ({code}): {message}")]
    Service {
        /// Remote operation name, e.g. `CreateJob`
        operation: &'static str,
        /// Remote error code
        code: String,
        /// Error message from the service
        message: String,
    },

    /// A successful response was missing a field the caller relies on
    #[error("{operation} response is missing `{field}`")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    /// Upload to object storage failed
    #[error("Object storage error: {0}")]
    ObjectStore(String),

    /// Local file could not be read
    #[error("Failed to read {path}: {source}")]
    LocalFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// Create a service error from an operation name, code and message
    pub fn service(
        operation: &'static str,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Service {
            operation,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
            || matches!(self, Self::Service { code, .. } if code == "EntityNotFoundException")
    }
}

impl From<object_store::Error> for ClientError {
    fn from(err: object_store::Error) -> Self {
        Self::ObjectStore(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        assert!(ClientError::NotFound("job".to_string()).is_not_found());
        assert!(ClientError::service("GetJob", "EntityNotFoundException", "nope").is_not_found());
        assert!(!ClientError::service("GetJob", "AccessDeniedException", "denied").is_not_found());
        assert!(!ClientError::ObjectStore("boom".to_string()).is_not_found());
    }

    #[test]
    fn test_service_error_display() {
        let err = ClientError::service("CreateJob", "InvalidInputException", "bad role");
        assert_eq!(err.to_string(), "CreateJob failed (InvalidInputException): bad role");
    }
}
