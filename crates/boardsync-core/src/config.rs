//! Run configuration: TOML file, environment, and flag overrides.
//!
//! Precedence (highest wins): CLI flags, then `boardsync.toml`, then
//! built-in defaults. The API token never lives in the file; it comes
//! from the `GITHUB_TOKEN` environment variable or a flag. A missing
//! owner, repo, or token, or a data path that does not exist, is a
//! [`SyncError::Configuration`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SyncError};
use crate::labels::DEFAULT_EPIC_LABEL;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "boardsync.toml";

const DEFAULT_EPICS_DIR: &str = "epics";
const DEFAULT_STORIES_DIR: &str = "stories";
const DEFAULT_PRIORITY_FILE: &str = "priorities.txt";

/// Partial configuration, as read from the file or built from flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub epics_dir: Option<PathBuf>,
    #[serde(default)]
    pub stories_dir: Option<PathBuf>,
    #[serde(default)]
    pub priority_file: Option<PathBuf>,
    #[serde(default)]
    pub epic_label: Option<String>,
}

impl PartialConfig {
    /// Load from a TOML file. A missing file yields the empty partial;
    /// an unreadable or malformed file is a configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|err| {
            SyncError::Configuration(format!("failed to read {}: {err}", path.display()))
        })?;
        toml::from_str(&content).map_err(|err| {
            SyncError::Configuration(format!("failed to parse {}: {err}", path.display()))
        })
    }

    /// Overlay `self` on top of `base`; set fields in `self` win.
    #[must_use]
    pub fn over(self, base: Self) -> Self {
        Self {
            owner: self.owner.or(base.owner),
            repo: self.repo.or(base.repo),
            epics_dir: self.epics_dir.or(base.epics_dir),
            stories_dir: self.stories_dir.or(base.stories_dir),
            priority_file: self.priority_file.or(base.priority_file),
            epic_label: self.epic_label.or(base.epic_label),
        }
    }
}

/// Fully resolved run configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub owner: String,
    pub repo: String,
    pub token: String,
    pub epics_dir: PathBuf,
    pub stories_dir: PathBuf,
    pub priority_file: PathBuf,
    pub epic_label: String,
}

impl SyncConfig {
    /// Resolve a partial config and a token into a complete one,
    /// applying defaults for the optional paths.
    pub fn resolve(partial: PartialConfig, token: Option<String>) -> Result<Self> {
        let owner = require(partial.owner, "owner")?;
        let repo = require(partial.repo, "repo")?;
        let token = token.ok_or_else(|| {
            SyncError::Configuration(
                "missing API token: set GITHUB_TOKEN or pass --token".to_string(),
            )
        })?;

        Ok(Self {
            owner,
            repo,
            token,
            epics_dir: partial
                .epics_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EPICS_DIR)),
            stories_dir: partial
                .stories_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORIES_DIR)),
            priority_file: partial
                .priority_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PRIORITY_FILE)),
            epic_label: partial
                .epic_label
                .unwrap_or_else(|| DEFAULT_EPIC_LABEL.to_string()),
        })
    }

    /// Check that the data paths exist before any tracker call is made.
    pub fn validate_paths(&self) -> Result<()> {
        for (path, what) in [
            (&self.epics_dir, "epics directory"),
            (&self.stories_dir, "stories directory"),
            (&self.priority_file, "priority manifest"),
        ] {
            if !path.exists() {
                return Err(SyncError::Configuration(format!(
                    "{what} not found: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

fn require(value: Option<String>, field: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SyncError::Configuration(format!("missing required setting '{field}'")))
}
