//! Label deduplication and resolution.
//!
//! The label set for a run is the union of every epic's `label` plus the
//! reserved label marking parent issues as epics. Each distinct name is
//! resolved against the tracker exactly once, however many epics share
//! it; the resulting `name -> id` map is reused for every issue created
//! afterwards.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::error::Result;
use crate::hierarchy::EpicMap;
use crate::model::LabelId;
use crate::tracker::{RepositoryId, TrackerClient};

/// Default name for the reserved label attached to epic issues.
pub const DEFAULT_EPIC_LABEL: &str = "epic";

/// Resolved labels, keyed by name.
pub type LabelMap = BTreeMap<String, LabelId>;

/// The distinct label names a run needs: every epic's label plus the
/// reserved epic label. Sorted, so resolution order is deterministic.
#[must_use]
pub fn distinct_names(epics: &EpicMap, epic_label: &str) -> BTreeSet<String> {
    let mut names: BTreeSet<String> = epics.values().map(|epic| epic.label.clone()).collect();
    names.insert(epic_label.to_string());
    names
}

/// Resolve every distinct label name to a tracker id, one get-or-create
/// call per name. Any resolution failure (the reserved epic label
/// included) aborts the run.
pub fn resolve(
    client: &mut dyn TrackerClient,
    repository: &RepositoryId,
    epics: &EpicMap,
    epic_label: &str,
) -> Result<LabelMap> {
    let mut labels = LabelMap::new();
    for name in distinct_names(epics, epic_label) {
        let id = client.create_label_if_not_exists(repository, &name)?;
        info!(label = %name, id = %id, "label resolved");
        labels.insert(name, id);
    }
    Ok(labels)
}
