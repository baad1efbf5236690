//! The flat snapshot persisted at the end of a run.
//!
//! ```json
//! {
//!   "repositories": [{"repository_name": "repo1", "visibility": "public", ...}],
//!   "teams": [{"team_name": "t1", "privacy": "closed", "members": [...]}]
//! }
//! ```

use std::fs;
use std::io::Write;
use std::path::Path;

use reconciler_core::ExistingState;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::{StateError, StateResult};
use crate::tfstate::read_json;

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;

/// Writes `state` to `path` as pretty printed JSON.
///
/// Missing parent directories are created. The document is written to a
/// temporary file next to `path` and renamed over it, so a reader never
/// sees a partial snapshot.
pub fn save_snapshot(state: &ExistingState, path: &Path) -> StateResult<()> {
    let write_error = |source| StateError::Write {
        path: path.display().to_string(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_error)?;

    let mut payload = serde_json::to_vec_pretty(state).map_err(StateError::Serialize)?;
    payload.push(b'\n');

    let mut temp = NamedTempFile::new_in(parent).map_err(write_error)?;
    temp.write_all(&payload).map_err(write_error)?;
    temp.as_file().sync_all().map_err(write_error)?;
    temp.persist(path).map_err(|e| write_error(e.error))?;

    info!(
        path = %path.display(),
        repositories = state.repositories.len(),
        teams = state.teams.len(),
        "Saved state snapshot"
    );
    Ok(())
}

/// Reads a snapshot written by [`save_snapshot`].
///
/// # Errors
///
/// - `StateError::NotFound` if there is no snapshot at `path`
/// - `StateError::Parse` if the file is not JSON
/// - `StateError::Malformed` if the JSON is not a snapshot
pub fn load_snapshot(path: &Path) -> StateResult<ExistingState> {
    debug!(path = %path.display(), "Loading state snapshot");

    let document = read_json(path)?;
    serde_json::from_value(document).map_err(|e| StateError::Malformed {
        reason: format!("{}: {e}", path.display()),
    })
}
