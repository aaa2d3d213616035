//! Priority ordering of stories from the external manifest.
//!
//! The manifest is the single source of truth for story order; file
//! order never matters. It is a plain text file, one
//! `"<epicId>-<storyNumber>"` per line, with blank lines and `#`
//! comments skipped. A story whose id is not listed is a fatal
//! [`SyncError::Ordering`]: unlisted stories are a configuration error,
//! never silently skipped or defaulted.
//!
//! Duplicate manifest entries are not validated; the first occurrence
//! wins when building the rank map.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, SyncError};
use crate::model::StoryRecord;

/// Read the manifest as an ordered sequence of story identities.
pub fn load_manifest(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|err| SyncError::io(path, err))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Assign each story `priority = 1 + manifest index` and return the
/// stories sorted ascending by priority.
///
/// Priorities form a strict total order: manifest indices are unique by
/// construction, so ties cannot occur.
pub fn rank(stories: Vec<StoryRecord>, manifest: &[String]) -> Result<Vec<StoryRecord>> {
    let mut rank_by_id: HashMap<&str, usize> = HashMap::with_capacity(manifest.len());
    for (index, story_id) in manifest.iter().enumerate() {
        rank_by_id.entry(story_id.as_str()).or_insert(index);
    }

    let mut ranked = Vec::with_capacity(stories.len());
    for mut story in stories {
        let Some(index) = rank_by_id.get(story.story_id.as_str()) else {
            return Err(SyncError::Ordering {
                file: story.source,
                story_id: story.story_id,
            });
        };
        story.priority = index + 1;
        ranked.push(story);
    }

    ranked.sort_by_key(|story| story.priority);
    Ok(ranked)
}
