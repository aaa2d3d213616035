//! Grouping of parsed story records under their owning epic.
//!
//! The epic map is the shared backbone of the pipeline: an explicit
//! owned `epicId -> EpicRecord` mapping handed from stage to stage, not
//! ambient state. Stories append to their epic's `stories` collection in
//! file-discovery order; priority is attached later by the orderer.
//!
//! A story whose `epicId` has no matching epic is a fatal
//! [`SyncError::Hierarchy`] naming the offending file.

use std::collections::BTreeMap;

use crate::error::{Result, SyncError};
use crate::frontmatter::{self, ParsedRecord};
use crate::indexer::{EpicSource, StorySource};
use crate::model::{EpicRecord, StoryRecord};

/// Epic records keyed by id, iterated in ascending id order (which is
/// file-discovery order, since the id is the leading filename segment).
pub type EpicMap = BTreeMap<String, EpicRecord>;

/// Parse every epic and story source and group stories under epics.
///
/// Titles are validated here, before any tracker call is made:
/// an epic needs a frontmatter `title` and a `label`; a story needs
/// either a narrative triple (from which its title is derived) or a
/// frontmatter `title`.
pub fn build(epics: Vec<EpicSource>, stories: Vec<StorySource>) -> Result<EpicMap> {
    let mut map = EpicMap::new();

    for source in epics {
        let record = parse_epic(&source)?;
        map.insert(record.id.clone(), record);
    }

    for source in stories {
        let story = parse_story(&source)?;
        let Some(epic) = map.get_mut(&story.epic_id) else {
            return Err(SyncError::Hierarchy {
                file: source.path,
                epic_id: story.epic_id,
            });
        };
        epic.stories.push(story);
    }

    Ok(map)
}

fn parse_epic(source: &EpicSource) -> Result<EpicRecord> {
    let ParsedRecord {
        fields,
        description,
    } = frontmatter::parse(&source.path, &source.content)?;

    let title = fields
        .title
        .clone()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| SyncError::parse(&source.path, "epic is missing required 'title'"))?;
    let label = fields
        .label
        .clone()
        .filter(|l| !l.is_empty())
        .ok_or_else(|| SyncError::parse(&source.path, "epic is missing required 'label'"))?;

    Ok(EpicRecord {
        id: source.epic_id.clone(),
        title,
        label,
        narrative: fields.narrative(),
        description,
        stories: Vec::new(),
        issue_id: None,
        source: source.path.clone(),
    })
}

fn parse_story(source: &StorySource) -> Result<StoryRecord> {
    let ParsedRecord {
        fields,
        description,
    } = frontmatter::parse(&source.path, &source.content)?;

    let narrative = fields.narrative();

    // Derived title: the role/action sentence when the narrative triple
    // is present, the frontmatter title otherwise.
    let title = match narrative.as_ref() {
        Some(n) => format!("As a {}, I want to {}", n.role, n.action),
        None => fields
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                SyncError::parse(&source.path, "story has neither a narrative nor a 'title'")
            })?,
    };

    Ok(StoryRecord {
        epic_id: source.epic_id.clone(),
        story_id: format!("{}-{}", source.epic_id, source.story_number),
        title,
        narrative,
        description,
        priority: 0,
        parent_issue_id: None,
        label_id: None,
        issue_id: None,
        source: source.path.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn epic_source(id: &str, content: &str) -> EpicSource {
        EpicSource {
            epic_id: id.to_string(),
            path: PathBuf::from(format!("epics/{id}-epic.md")),
            content: content.to_string(),
        }
    }

    fn story_source(epic: &str, number: &str, content: &str) -> StorySource {
        StorySource {
            epic_id: epic.to_string(),
            story_number: number.to_string(),
            path: PathBuf::from(format!("stories/{epic}-{number}-story.md")),
            content: content.to_string(),
        }
    }

    const EPIC: &str = "---\ntitle: Auth\nlabel: backend\n---\nEpic body.\n";
    const STORY: &str =
        "---\nrole: user\naction: log in\nbenefit: my data is safe\n---\nStory body.\n";

    #[test]
    fn stories_group_under_their_epic_in_order() {
        let map = build(
            vec![epic_source("001", EPIC)],
            vec![
                story_source("001", "001", STORY),
                story_source("001", "002", STORY),
            ],
        )
        .expect("build");

        let epic = map.get("001").expect("epic present");
        let ids: Vec<&str> = epic.stories.iter().map(|s| s.story_id.as_str()).collect();
        assert_eq!(ids, ["001-001", "001-002"]);
    }

    #[test]
    fn story_with_unknown_epic_is_a_hierarchy_error() {
        let err = build(
            vec![epic_source("001", EPIC)],
            vec![story_source("003", "001", STORY)],
        )
        .expect_err("must fail");

        match err {
            SyncError::Hierarchy { file, epic_id } => {
                assert_eq!(epic_id, "003");
                assert!(file.to_string_lossy().contains("003-001-story.md"));
            }
            other => panic!("expected Hierarchy error, got {other}"),
        }
    }

    #[test]
    fn story_title_derives_from_narrative() {
        let map = build(
            vec![epic_source("001", EPIC)],
            vec![story_source("001", "001", STORY)],
        )
        .expect("build");

        let story = &map.get("001").expect("epic").stories[0];
        assert_eq!(story.title, "As a user, I want to log in");
    }

    #[test]
    fn story_title_falls_back_to_frontmatter() {
        let content = "---\ntitle: Plain story\n---\nBody.\n";
        let map = build(
            vec![epic_source("001", EPIC)],
            vec![story_source("001", "001", content)],
        )
        .expect("build");

        assert_eq!(map.get("001").expect("epic").stories[0].title, "Plain story");
    }

    #[test]
    fn story_without_title_or_narrative_is_a_parse_error() {
        let content = "---\nlabel: ignored\n---\nBody only.\n";
        let err = build(
            vec![epic_source("001", EPIC)],
            vec![story_source("001", "001", content)],
        )
        .expect_err("must fail");
        assert!(matches!(err, SyncError::Parse { .. }), "got {err}");
    }

    #[test]
    fn epic_without_title_is_a_parse_error() {
        let err = build(vec![epic_source("001", "---\nlabel: x\n---\n")], vec![])
            .expect_err("must fail");
        assert!(err.to_string().contains("'title'"));
    }

    #[test]
    fn epic_without_label_is_a_parse_error() {
        let err = build(vec![epic_source("001", "---\ntitle: x\n---\n")], vec![])
            .expect_err("must fail");
        assert!(err.to_string().contains("'label'"));
    }
}
