use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::github::issues::IssueRecord;

/// Default snapshot location, relative to the working directory of the run.
pub const SNAPSHOT_FILE: &str = "issue_snapshot.json";

/// All tracked issues at one point in time, keyed by issue number.
///
/// A BTreeMap keeps iteration, and therefore changelog ordering, ascending by
/// issue number. serde_json writes the numeric keys as JSON object strings,
/// which is the persisted format previous snapshots use.
pub type StateMapping = BTreeMap<u64, IssueRecord>;

/// Builds the issue-number-keyed mapping for one run's fetched issues.
pub fn build_mapping(issues: Vec<IssueRecord>) -> StateMapping {
    issues
        .into_iter()
        .map(|issue| (issue.number, issue))
        .collect()
}

/// Abstract snapshot persistence interface
pub trait SnapshotStore {
    /// Return the previous run's mapping. If no snapshot exists, returns Ok(None)
    fn load(&self) -> Result<Option<StateMapping>>;
    /// Persist the mapping, fully replacing any prior snapshot
    fn save(&self, mapping: &StateMapping) -> Result<()>;
}

/// File-based snapshot persistence implementation
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSnapshotStore { path: path.into() }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<StateMapping>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).context("Failed to read snapshot file")?;
        let mapping = serde_json::from_str(&content).context("Failed to parse snapshot file")?;
        Ok(Some(mapping))
    }

    fn save(&self, mapping: &StateMapping) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create snapshot directory")?;
        }
        let content =
            serde_json::to_string_pretty(mapping).context("Failed to serialize snapshot")?;
        fs::write(&self.path, content).context("Failed to write snapshot file")?;
        Ok(())
    }
}
