use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::node::TreeNode;

/// Persisted session (written to .session.json)
///
/// The three navigation keys are only meaningful together: a session is
/// restored only when all of them are present.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SessionState {
    /// The node the user was looking at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_selected: Option<TreeNode>,
    /// Breadcrumb titles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breadcrumbs: Option<Vec<String>>,
    /// Navigation stack, first descended level first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<TreeNode>>,
    /// Levels undone by back, most recent last
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward: Option<Vec<TreeNode>>,
    /// Selected display language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

pub fn session_path(site_dir: &Path) -> PathBuf {
    site_dir.join(".session.json")
}

/// Read .session.json from the site directory.
///
/// Missing or malformed files yield `None`; a malformed file is logged.
pub fn read_session(site_dir: &Path) -> Option<SessionState> {
    let path = session_path(site_dir);
    let content = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed session file");
            None
        }
    }
}

/// Write .session.json to the site directory
pub fn write_session(site_dir: &Path, state: &SessionState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    super::atomic_write(&session_path(site_dir), content.as_bytes())
}
