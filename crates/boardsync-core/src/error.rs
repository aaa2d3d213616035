//! Error taxonomy for the sync pipeline.
//!
//! Every variant is fatal: nothing is recovered locally. An error aborts
//! the run immediately and is reported to the operator with enough
//! context (file name or identity) to locate the offending record.
//! Re-running after a partial failure may duplicate already-created
//! epics and stories; only label resolution is idempotent.

use std::path::PathBuf;

/// Errors that abort a sync run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Missing or invalid configuration (owner/repo/token, data paths).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed frontmatter, missing required title, or a filename that
    /// does not follow the `NNN[-MMM]-slug.md` convention.
    #[error("parse error in {file}: {reason}")]
    Parse { file: PathBuf, reason: String },

    /// A story references an epic that does not exist.
    #[error("story {file} references unknown epic '{epic_id}'")]
    Hierarchy { file: PathBuf, epic_id: String },

    /// A story is absent from the priority manifest.
    #[error("story '{story_id}' ({file}) is not listed in the priority manifest")]
    Ordering { file: PathBuf, story_id: String },

    /// A tracker call failed (network, auth, or API error).
    #[error("tracker error during {operation}: {reason}")]
    ExternalService { operation: String, reason: String },

    /// I/O error reading source files or the manifest.
    #[error("I/O error on {file}: {source}")]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Shorthand for [`SyncError::Parse`].
    pub fn parse(file: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SyncError::ExternalService`].
    pub fn external(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExternalService {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SyncError::Io`].
    pub fn io(file: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            file: file.into(),
            source,
        }
    }
}

/// Result alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::SyncError;
    use std::path::PathBuf;

    #[test]
    fn hierarchy_error_names_file_and_epic() {
        let err = SyncError::Hierarchy {
            file: PathBuf::from("stories/003-001-login.md"),
            epic_id: "003".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("003-001-login.md"));
        assert!(msg.contains("'003'"));
    }

    #[test]
    fn ordering_error_names_story_id() {
        let err = SyncError::Ordering {
            file: PathBuf::from("stories/001-002-search.md"),
            story_id: "001-002".to_string(),
        };
        assert!(err.to_string().contains("001-002"));
        assert!(err.to_string().contains("priority manifest"));
    }
}
