//! Dependency-respecting creation sequence against the tracker.
//!
//! The run is strictly ordered and not reentrant:
//!
//! 1. Resolve repository and project board identity.
//! 2. Resolve all labels (precondition for everything after).
//! 3. Create epic issues, in ascending epic-id order, each tagged with
//!    the reserved epic label.
//! 4. Rank stories by the priority manifest.
//! 5. Create story issues in ascending priority order, each wired to
//!    its already-created parent epic's issue id and its epic's label
//!    id, and attached to the project board.
//!
//! Every call is awaited before the next is issued; the board orders
//! cards by call sequence, so cross-entity ordering is a hard
//! dependency. Any failure aborts the remaining sequence immediately.
//! Nothing is rolled back or retried: partially created external state
//! is the expected outcome of a failed run, and each successful
//! resolution and creation is logged so the operator can see exactly
//! what exists on the tracker when a run aborts.

use tracing::info;

use crate::error::{Result, SyncError};
use crate::hierarchy::EpicMap;
use crate::labels::{self, LabelMap};
use crate::model::{IssueId, LabelId, StoryRecord};
use crate::priority;
use crate::tracker::{NewIssue, TrackerClient};

/// Identity of the repository and board a run targets.
#[derive(Debug, Clone)]
pub struct SyncTarget {
    pub owner: String,
    pub repo: String,
    /// Name of the reserved label attached to epic issues.
    pub epic_label: String,
}

/// What a completed run created, for reporting.
#[derive(Debug)]
pub struct SyncReport {
    /// Resolved labels, keyed by name.
    pub labels: LabelMap,
    /// Epic records with `issue_id` attached.
    pub epics: EpicMap,
    /// Story records in creation (= priority) order, ids attached.
    pub stories: Vec<StoryRecord>,
}

impl SyncReport {
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} labels resolved, {} epics created, {} stories created",
            self.labels.len(),
            self.epics.len(),
            self.stories.len()
        )
    }
}

/// Drive the full creation sequence. Consumes the epic map and returns
/// it in the report with tracker-assigned ids attached.
pub fn run(
    client: &mut dyn TrackerClient,
    target: &SyncTarget,
    mut epics: EpicMap,
    manifest: &[String],
) -> Result<SyncReport> {
    let repository = client.repository_id(&target.owner, &target.repo)?;
    let project = client.project_info(&target.owner, &target.repo)?;
    info!(
        owner = %target.owner,
        repo = %target.repo,
        project = %project.title,
        "sync target resolved"
    );

    let labels = labels::resolve(client, &repository, &epics, &target.epic_label)?;
    let epic_label_id = labels
        .get(&target.epic_label)
        .cloned()
        .ok_or_else(|| {
            SyncError::Configuration(format!(
                "reserved epic label '{}' was not resolved",
                target.epic_label
            ))
        })?;

    // Epics first: every story needs its parent's issue id.
    for epic in epics.values_mut() {
        let body = epic.body();
        let issue = NewIssue {
            title: &epic.title,
            body: &body,
            parent_issue_id: None,
        };
        let issue_id = client.create_issue(&repository, &issue, &epic_label_id)?;
        info!(epic = %epic.id, issue = %issue_id, title = %epic.title, "epic created");
        epic.issue_id = Some(issue_id);
    }

    // Priority resolution needs all stories parsed but is independent of
    // epic creation; it must complete before any story is created.
    let stories: Vec<StoryRecord> = epics
        .values_mut()
        .flat_map(|epic| std::mem::take(&mut epic.stories))
        .collect();
    let ranked = priority::rank(stories, manifest)?;

    let mut created = Vec::with_capacity(ranked.len());
    for mut story in ranked {
        let (parent_issue_id, label_id) = wire_story(&epics, &labels, &story)?;
        let body = story.body();
        let issue = NewIssue {
            title: &story.title,
            body: &body,
            parent_issue_id: Some(&parent_issue_id),
        };
        let issue_id = client.create_issue_add_to_project(&repository, &project, &issue, &label_id)?;
        info!(
            story = %story.story_id,
            priority = story.priority,
            issue = %issue_id,
            "story created"
        );
        story.parent_issue_id = Some(parent_issue_id);
        story.label_id = Some(label_id);
        story.issue_id = Some(issue_id);
        created.push(story);
    }

    Ok(SyncReport {
        labels,
        epics,
        stories: created,
    })
}

/// Resolve a story's parent issue id and label id from its owning epic.
fn wire_story(
    epics: &EpicMap,
    labels: &LabelMap,
    story: &StoryRecord,
) -> Result<(IssueId, LabelId)> {
    let epic = epics.get(&story.epic_id).ok_or_else(|| SyncError::Hierarchy {
        file: story.source.clone(),
        epic_id: story.epic_id.clone(),
    })?;
    let parent = epic.issue_id.clone().ok_or_else(|| {
        SyncError::external(
            "create_issue_add_to_project",
            format!("epic '{}' has no issue id", epic.id),
        )
    })?;
    let label = labels.get(&epic.label).cloned().ok_or_else(|| {
        SyncError::Configuration(format!("label '{}' was not resolved", epic.label))
    })?;
    Ok((parent, label))
}
