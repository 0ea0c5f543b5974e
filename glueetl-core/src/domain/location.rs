//! Script location
//!
//! Object-storage URIs of the form `scheme://bucket/key`. The URI syntax is
//! checked with a real parser; bucket and key are kept verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Errors produced while parsing a script location
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The input is not a URI at all
    #[error("invalid script location `{input}`: {reason}")]
    Invalid { input: String, reason: String },

    /// No bucket in the authority part
    #[error("script location `{0}` has no bucket")]
    MissingBucket(String),

    /// Nothing after the bucket
    #[error("script location `{0}` has no object key")]
    MissingKey(String),

    /// Scheme is not one the caller can upload to
    #[error("script location `{input}` uses unsupported scheme `{scheme}` (expected `{expected}`)")]
    UnsupportedScheme {
        input: String,
        scheme: String,
        expected: String,
    },
}

/// A parsed `scheme://bucket/key` location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScriptLocation {
    uri: String,
    scheme: String,
    bucket: String,
    key: String,
}

impl ScriptLocation {
    /// Parse a location URI into its scheme, bucket and key.
    ///
    /// Bucket and key are kept exactly as written, escapes included, so the
    /// key that is uploaded and the location the job is given always name the
    /// same object. Every key segment must be non-empty and neither `.` nor
    /// `..`.
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let trimmed = input.trim();
        let invalid = |reason: String| LocationError::Invalid {
            input: trimmed.to_string(),
            reason,
        };

        let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;

        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid(
                "query strings and fragments are not allowed".to_string(),
            ));
        }
        if !url.username().is_empty() || url.password().is_some() || url.port().is_some() {
            return Err(invalid("user info and ports are not allowed".to_string()));
        }

        let rest = trimmed
            .split_once("://")
            .map(|(_, rest)| rest)
            .ok_or_else(|| LocationError::MissingBucket(trimmed.to_string()))?;

        let (bucket, key) = match rest.split_once('/') {
            Some((bucket, key)) => (bucket, key),
            None if rest.is_empty() => {
                return Err(LocationError::MissingBucket(trimmed.to_string()));
            }
            None => return Err(LocationError::MissingKey(trimmed.to_string())),
        };

        if bucket.is_empty() {
            return Err(LocationError::MissingBucket(trimmed.to_string()));
        }
        if key.is_empty() || key.ends_with('/') {
            return Err(LocationError::MissingKey(trimmed.to_string()));
        }

        for segment in key.split('/') {
            match segment {
                "" => return Err(invalid("object key has an empty segment".to_string())),
                "." | ".." => {
                    return Err(invalid(format!(
                        "object key has a relative segment `{segment}`"
                    )));
                }
                _ if segment.chars().any(char::is_control) => {
                    return Err(invalid(
                        "object key contains control characters".to_string(),
                    ));
                }
                _ => {}
            }
        }

        Ok(Self {
            uri: trimmed.to_string(),
            scheme: url.scheme().to_string(),
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    /// Fail unless this location uses `expected` as its scheme
    pub fn require_scheme(&self, expected: &str) -> Result<(), LocationError> {
        if self.scheme.eq_ignore_ascii_case(expected) {
            Ok(())
        } else {
            Err(LocationError::UnsupportedScheme {
                input: self.uri.clone(),
                scheme: self.scheme.clone(),
                expected: expected.to_string(),
            })
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The location exactly as written in configuration
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for ScriptLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl TryFrom<String> for ScriptLocation {
    type Error = LocationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ScriptLocation> for String {
    fn from(location: ScriptLocation) -> Self {
        location.uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bucket_and_key() {
        let loc = ScriptLocation::parse("s3://glue-job-scripts/sample-glue-job/script.py").unwrap();
        assert_eq!(loc.scheme(), "s3");
        assert_eq!(loc.bucket(), "glue-job-scripts");
        assert_eq!(loc.key(), "sample-glue-job/script.py");
        assert_eq!(loc.as_str(), "s3://glue-job-scripts/sample-glue-job/script.py");
    }

    #[test]
    fn test_parse_keeps_escaped_key_as_written() {
        let loc = ScriptLocation::parse("s3://bucket/jobs/my%20job.py").unwrap();
        assert_eq!(loc.key(), "jobs/my%20job.py");
        assert_eq!(
            format!("s3://{}/{}", loc.bucket(), loc.key()),
            loc.as_str()
        );
    }

    #[test]
    fn test_parse_keeps_unescaped_characters() {
        let loc = ScriptLocation::parse("s3://bucket/jobs/my job+v2.py").unwrap();
        assert_eq!(loc.key(), "jobs/my job+v2.py");
    }

    #[test]
    fn test_parse_rejects_empty_segment() {
        assert!(matches!(
            ScriptLocation::parse("s3://bucket/a//b/script.py"),
            Err(LocationError::Invalid { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_relative_segments() {
        for input in ["s3://bucket/./script.py", "s3://bucket/jobs/../script.py"] {
            assert!(
                matches!(ScriptLocation::parse(input), Err(LocationError::Invalid { .. })),
                "{input}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_port_and_user_info() {
        assert!(ScriptLocation::parse("s3://bucket:9000/script.py").is_err());
        assert!(ScriptLocation::parse("s3://me@bucket/script.py").is_err());
    }

    #[test]
    fn test_parse_missing_key() {
        assert_eq!(
            ScriptLocation::parse("s3://bucket"),
            Err(LocationError::MissingKey("s3://bucket".to_string()))
        );
        assert!(matches!(
            ScriptLocation::parse("s3://bucket/prefix/"),
            Err(LocationError::MissingKey(_))
        ));
    }

    #[test]
    fn test_parse_missing_bucket() {
        assert!(matches!(
            ScriptLocation::parse("s3:///script.py"),
            Err(LocationError::MissingBucket(_))
        ));
    }

    #[test]
    fn test_parse_not_a_uri() {
        assert!(matches!(
            ScriptLocation::parse("glue-job-scripts/script.py"),
            Err(LocationError::Invalid { .. })
        ));
    }

    #[test]
    fn test_require_scheme() {
        let loc = ScriptLocation::parse("gs://bucket/script.py").unwrap();
        assert!(loc.require_scheme("s3").is_err());
        assert!(ScriptLocation::parse("S3://bucket/script.py")
            .unwrap()
            .require_scheme("s3")
            .is_ok());
    }
}
