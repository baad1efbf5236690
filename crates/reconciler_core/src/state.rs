//! The flat baseline recorded by the previous run.

use serde::{Deserialize, Serialize};

use crate::repository::Repository;
use crate::resource::{AttributeMap, ManagedResource};
use crate::team::Team;

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;

/// Plain attribute maps for every repository and team known to exist.
///
/// Entries may carry only a subset of a resource's fields, depending on
/// what the state source recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExistingState {
    pub repositories: Vec<AttributeMap>,
    pub teams: Vec<AttributeMap>,
}

impl ExistingState {
    pub fn new(repositories: Vec<AttributeMap>, teams: Vec<AttributeMap>) -> Self {
        Self {
            repositories,
            teams,
        }
    }

    /// The snapshot of a desired state, used as the next run's baseline.
    pub fn from_desired(repositories: &[Repository], teams: &[Team]) -> Self {
        Self {
            repositories: repositories.iter().map(Repository::to_attributes).collect(),
            teams: teams.iter().map(Team::to_attributes).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty() && self.teams.is_empty()
    }
}
