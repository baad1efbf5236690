//! The change set for one reconciliation run.

use tracing::info;

use crate::diff::{diff, ExistingResource};
use crate::errors::DiffError;
use crate::repository::Repository;
use crate::resource::{REPOSITORY_KEY, TEAM_KEY};
use crate::state::ExistingState;
use crate::team::Team;

#[cfg(test)]
#[path = "changes_tests.rs"]
mod tests;

/// Every action a run has to take, for both resource kinds.
///
/// Built once by [`ChangeSet::compute`] and consumed by the
/// [`ResourceProcessor`](crate::ResourceProcessor).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub repos_to_add: Vec<Repository>,
    pub repos_to_update: Vec<Repository>,
    pub repos_to_delete: Vec<ExistingResource>,
    pub teams_to_add: Vec<Team>,
    pub teams_to_update: Vec<Team>,
    pub teams_to_delete: Vec<ExistingResource>,
}

impl ChangeSet {
    /// Diffs repositories by `repository_name` and teams by `team_name`.
    pub fn compute(
        existing: &ExistingState,
        repositories: &[Repository],
        teams: &[Team],
    ) -> Result<Self, DiffError> {
        let repos = diff(&existing.repositories, repositories, REPOSITORY_KEY)?;
        let teams = diff(&existing.teams, teams, TEAM_KEY)?;

        let change_set = Self {
            repos_to_add: repos.to_add,
            repos_to_update: repos.to_update,
            repos_to_delete: repos.to_delete,
            teams_to_add: teams.to_add,
            teams_to_update: teams.to_update,
            teams_to_delete: teams.to_delete,
        };

        info!(
            repos_to_add = change_set.repos_to_add.len(),
            repos_to_update = change_set.repos_to_update.len(),
            repos_to_delete = change_set.repos_to_delete.len(),
            teams_to_add = change_set.teams_to_add.len(),
            teams_to_update = change_set.teams_to_update.len(),
            teams_to_delete = change_set.teams_to_delete.len(),
            "Computed change set"
        );
        Ok(change_set)
    }

    /// Number of resource actions in the set.
    pub fn total(&self) -> usize {
        self.repos_to_add.len()
            + self.repos_to_update.len()
            + self.repos_to_delete.len()
            + self.teams_to_add.len()
            + self.teams_to_update.len()
            + self.teams_to_delete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
