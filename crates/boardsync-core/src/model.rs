//! Record types the pipeline carries between stages.
//!
//! All records are built once per run from a file-system scan and a
//! manifest read, mutated in place to attach tracker-assigned
//! identifiers as creation proceeds, and discarded at process exit.
//! `issue_id` / `label_id` fields are write-once: set by the
//! orchestrator after a successful tracker call, never overwritten.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Tracker-assigned opaque issue identifier (GraphQL node id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(pub String);

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tracker-assigned opaque label identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelId(pub String);

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A label on the tracker, resolved once per distinct name and reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRecord {
    pub name: String,
    pub id: LabelId,
}

/// The user-story narrative triple from frontmatter.
///
/// Rendered as one sentence when all three fields are present:
/// `"As a {role}, I want to {action} so that {benefit}."`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub role: String,
    pub action: String,
    pub benefit: String,
}

impl Narrative {
    /// Render the canonical narrative sentence.
    #[must_use]
    pub fn sentence(&self) -> String {
        format!(
            "As a {}, I want to {} so that {}.",
            self.role, self.action, self.benefit
        )
    }
}

/// A top-level epic record; becomes a parent issue on the tracker.
#[derive(Debug, Clone)]
pub struct EpicRecord {
    /// Key derived from the leading numeric filename segment, e.g. `"001"`.
    pub id: String,
    pub title: String,
    /// Label name from frontmatter; resolved to a [`LabelId`] later.
    pub label: String,
    pub narrative: Option<Narrative>,
    pub description: String,
    /// Ordered by append during hierarchy building.
    pub stories: Vec<StoryRecord>,
    /// Set once by the orchestrator after the epic issue is created.
    pub issue_id: Option<IssueId>,
    /// Source file, for diagnostics.
    pub source: PathBuf,
}

impl EpicRecord {
    /// Issue body for the epic: the narrative sentence if present,
    /// otherwise empty.
    #[must_use]
    pub fn body(&self) -> String {
        self.narrative
            .as_ref()
            .map(Narrative::sentence)
            .unwrap_or_default()
    }
}

/// A child story record; becomes a child issue linked to its epic.
#[derive(Debug, Clone)]
pub struct StoryRecord {
    /// Foreign key into the epic map.
    pub epic_id: String,
    /// Composite key `"<epicId>-<storyNumber>"`, e.g. `"001-002"`.
    pub story_id: String,
    pub title: String,
    pub narrative: Option<Narrative>,
    pub description: String,
    /// 1-based rank from the priority manifest; 0 until ordered.
    pub priority: usize,
    /// Owning epic's issue id, wired in just before creation.
    pub parent_issue_id: Option<IssueId>,
    /// Owning epic's label id, wired in just before creation.
    pub label_id: Option<LabelId>,
    /// Set once after the story issue is created.
    pub issue_id: Option<IssueId>,
    /// Source file, for diagnostics.
    pub source: PathBuf,
}

impl StoryRecord {
    /// Issue body for the story: the narrative sentence (if present)
    /// followed by the free-text description.
    #[must_use]
    pub fn body(&self) -> String {
        match self.narrative.as_ref() {
            Some(n) if self.description.is_empty() => n.sentence(),
            Some(n) => format!("{}\n\n{}", n.sentence(), self.description),
            None => self.description.clone(),
        }
    }
}
