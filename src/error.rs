use thiserror::Error;

use crate::document::PathError;
use crate::domain::VersionError;

/// Unified error type for helm-release operations
#[derive(Error, Debug)]
pub enum HelmReleaseError {
    #[error("Chart discovery failed: {0}")]
    Discovery(String),

    #[error("Repository query failed: {0}")]
    VcsQuery(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wrote {written} but failed to write {failed}; the chart is now inconsistent: {source}")]
    PartialUpdate {
        written: String,
        failed: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in helm-release
pub type Result<T> = std::result::Result<T, HelmReleaseError>;

impl HelmReleaseError {
    /// Create a discovery error with context
    pub fn discovery(msg: impl Into<String>) -> Self {
        HelmReleaseError::Discovery(msg.into())
    }

    /// Create a repository query error with context
    pub fn vcs_query(msg: impl Into<String>) -> Self {
        HelmReleaseError::VcsQuery(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        HelmReleaseError::Manifest(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        HelmReleaseError::Config(msg.into())
    }

    /// Whether the error comes from repository state rather than from
    /// parsing, documents or the filesystem.
    ///
    /// Only these errors may be tolerated when strict mode is off.
    pub fn is_repo_state_error(&self) -> bool {
        matches!(
            self,
            HelmReleaseError::VcsQuery(_)
                | HelmReleaseError::Git(_)
                | HelmReleaseError::Version(VersionError::AmbiguousTag)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HelmReleaseError::config("bad source");
        assert_eq!(err.to_string(), "Configuration error: bad source");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: HelmReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_version_error_is_transparent() {
        let err: HelmReleaseError = VersionError::AmbiguousTag.into();
        assert_eq!(err.to_string(), VersionError::AmbiguousTag.to_string());
    }

    #[test]
    fn test_repo_state_errors() {
        assert!(HelmReleaseError::vcs_query("no HEAD").is_repo_state_error());
        assert!(HelmReleaseError::from(VersionError::AmbiguousTag).is_repo_state_error());

        let parse = VersionError::TagParse {
            tag: "abc".to_string(),
            reason: "unexpected character".to_string(),
        };
        assert!(!HelmReleaseError::from(parse).is_repo_state_error());
        assert!(!HelmReleaseError::manifest("x").is_repo_state_error());
        assert!(!HelmReleaseError::discovery("x").is_repo_state_error());
    }

    #[test]
    fn test_partial_update_names_both_files() {
        let err = HelmReleaseError::PartialUpdate {
            written: "values.yaml".to_string(),
            failed: "Chart.yaml".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("values.yaml"));
        assert!(msg.contains("Chart.yaml"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (HelmReleaseError::discovery("x"), "Chart discovery failed"),
            (HelmReleaseError::vcs_query("x"), "Repository query failed"),
            (HelmReleaseError::manifest("x"), "Manifest error"),
            (HelmReleaseError::config("x"), "Configuration error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
