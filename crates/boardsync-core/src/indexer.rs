//! File discovery for epic and story sources.
//!
//! Epic files are named `NNN-<slug>.md` (a leading run of digits, a `-`
//! separator, then anything). Story files are named `NNN-MMM-<slug>.md`
//! where `NNN` is the owning epic's id and `MMM` the story number.
//! Filenames that carry the `.md` extension but do not follow the
//! convention are a fatal parse error rather than a skip: a typo'd name
//! silently dropping a record is worse than a loud failure.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};

const MARKDOWN_EXT: &str = "md";
const SEPARATOR: char = '-';

/// An epic source file: derived id plus raw content.
#[derive(Debug, Clone)]
pub struct EpicSource {
    pub epic_id: String,
    pub path: PathBuf,
    pub content: String,
}

/// A story source file: derived `(epicId, storyNumber)` plus raw content.
#[derive(Debug, Clone)]
pub struct StorySource {
    pub epic_id: String,
    pub story_number: String,
    pub path: PathBuf,
    pub content: String,
}

/// List epic sources in `dir`, sorted by filename.
///
/// # Errors
///
/// [`SyncError::Io`] if the directory or a file cannot be read;
/// [`SyncError::Parse`] if a markdown filename has no leading digit run.
pub fn index_epics(dir: &Path) -> Result<Vec<EpicSource>> {
    let mut sources = Vec::new();
    for path in markdown_files(dir)? {
        let stem = file_stem(&path)?;
        let mut segments = stem.split(SEPARATOR);
        let epic_id = digit_segment(&path, segments.next())?;
        let content = read_file(&path)?;
        sources.push(EpicSource {
            epic_id,
            path,
            content,
        });
    }
    Ok(sources)
}

/// List story sources in `dir`, sorted by filename.
///
/// # Errors
///
/// [`SyncError::Io`] if the directory or a file cannot be read;
/// [`SyncError::Parse`] if a filename lacks the `NNN-MMM-` prefix.
pub fn index_stories(dir: &Path) -> Result<Vec<StorySource>> {
    let mut sources = Vec::new();
    for path in markdown_files(dir)? {
        let stem = file_stem(&path)?;
        let mut segments = stem.split(SEPARATOR);
        let epic_id = digit_segment(&path, segments.next())?;
        let story_number = digit_segment(&path, segments.next())?;
        let content = read_file(&path)?;
        sources.push(StorySource {
            epic_id,
            story_number,
            path,
            content,
        });
    }
    Ok(sources)
}

/// All `*.md` paths in `dir`, sorted by filename for deterministic runs.
fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|err| SyncError::io(dir, err))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| SyncError::io(dir, err))?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == MARKDOWN_EXT) {
            paths.push(path);
        }
    }
    paths.sort_unstable();
    Ok(paths)
}

fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| SyncError::parse(path, "file has no stem"))
}

/// Validate that a filename segment is a non-empty run of ASCII digits.
fn digit_segment(path: &Path, segment: Option<&str>) -> Result<String> {
    match segment {
        Some(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => Ok(s.to_string()),
        _ => Err(SyncError::parse(
            path,
            "filename must start with digit segments separated by '-' (e.g. 001-title.md)",
        )),
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| SyncError::io(path, err))
}
