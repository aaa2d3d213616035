//! The tracker-client seam.
//!
//! The pipeline never talks to a network directly; it drives a
//! [`TrackerClient`], which the binary implements against GitHub's
//! GraphQL API and tests implement in memory. Every method is a single
//! blocking call; the pipeline awaits each result before issuing the
//! next, so implementations need no internal ordering guarantees.

use crate::error::Result;
use crate::model::{IssueId, LabelId};

/// Tracker-assigned opaque repository identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryId(pub String);

/// Identity of the project board issues are attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    /// Opaque node id of the board.
    pub project_id: String,
    /// Board title, for logs only.
    pub title: String,
}

/// Payload for one issue-creation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue<'a> {
    pub title: &'a str,
    pub body: &'a str,
    /// Present for stories: the already-created parent epic's issue.
    pub parent_issue_id: Option<&'a IssueId>,
}

/// External issue-tracking service, abstracted over the transport.
///
/// `create_label_if_not_exists` is the only idempotent operation;
/// repeated runs must not create duplicate labels for the same name.
/// Issue creation is not idempotent, so a re-run after a partial
/// failure will duplicate already-created issues.
pub trait TrackerClient {
    /// Resolve the repository's opaque identifier.
    fn repository_id(&mut self, owner: &str, repo: &str) -> Result<RepositoryId>;

    /// Resolve the project board issues will be attached to.
    fn project_info(&mut self, owner: &str, repo: &str) -> Result<ProjectInfo>;

    /// Get or create a label by name. Idempotent.
    fn create_label_if_not_exists(
        &mut self,
        repository: &RepositoryId,
        name: &str,
    ) -> Result<LabelId>;

    /// Create a plain issue (used for epics). Returns the new issue's id.
    fn create_issue(
        &mut self,
        repository: &RepositoryId,
        issue: &NewIssue<'_>,
        label: &LabelId,
    ) -> Result<IssueId>;

    /// Create an issue and attach it to the project board (used for
    /// stories). The board is assumed to order cards by call sequence.
    fn create_issue_add_to_project(
        &mut self,
        repository: &RepositoryId,
        project: &ProjectInfo,
        issue: &NewIssue<'_>,
        label: &LabelId,
    ) -> Result<IssueId>;
}
