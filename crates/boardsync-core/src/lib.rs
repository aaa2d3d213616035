//! boardsync-core: hierarchy resolution and ordered-creation pipeline.
//!
//! Reads epic and story markdown records from disk, groups stories
//! under their owning epic, dedupes and resolves labels, ranks stories
//! by an external priority manifest, and sequences the dependent
//! creation calls (labels, then epics, then stories) against an issue
//! tracker so every story references an already-created parent epic.
//!
//! # Conventions
//!
//! - **Errors**: typed [`error::SyncError`]; every variant is fatal and
//!   carries the file or identity needed to locate the offending record.
//! - **Logging**: `tracing` macros; each external mutation is logged at
//!   info level before the run moves on, so an aborted run's log shows
//!   exactly what was created.
//! - **No persistence**: records live for one run and are discarded.

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod hierarchy;
pub mod indexer;
pub mod labels;
pub mod model;
pub mod orchestrator;
pub mod priority;
pub mod tracker;

use config::SyncConfig;
use error::Result;
use orchestrator::{SyncReport, SyncTarget};
use tracker::TrackerClient;

/// Run the whole pipeline: scan, group, rank, create.
///
/// Validates the configured data paths, then performs one linear pass;
/// the first error aborts with nothing rolled back.
pub fn sync(client: &mut dyn TrackerClient, config: &SyncConfig) -> Result<SyncReport> {
    config.validate_paths()?;

    let epic_sources = indexer::index_epics(&config.epics_dir)?;
    let story_sources = indexer::index_stories(&config.stories_dir)?;
    let epics = hierarchy::build(epic_sources, story_sources)?;
    let manifest = priority::load_manifest(&config.priority_file)?;

    let target = SyncTarget {
        owner: config.owner.clone(),
        repo: config.repo.clone(),
        epic_label: config.epic_label.clone(),
    };
    orchestrator::run(client, &target, epics, &manifest)
}
