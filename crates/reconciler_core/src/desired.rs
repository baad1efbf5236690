//! Turning raw desired-resource lists into validated resources.

use config_manager::{RepositoryDefaults, TeamDefaults};
use serde_json::Value;
use tracing::{debug, warn};

use crate::defaults::{apply_repository_defaults, apply_team_defaults};
use crate::errors::{InvalidResource, ReconcilerError, ReconcilerResult, ValidationError};
use crate::repository::Repository;
use crate::resource::{identity_of, AttributeMap, ManagedResource};
use crate::team::Team;

#[cfg(test)]
#[path = "desired_tests.rs"]
mod tests;

/// The validated desired state for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredResources {
    pub repositories: Vec<Repository>,
    pub teams: Vec<Team>,
}

impl DesiredResources {
    /// Applies defaults to every raw entry, then validates it.
    ///
    /// Every entry is checked. If any fails, all failures are returned
    /// together in [`ReconcilerError::InvalidDesiredResources`] and no
    /// resources are produced.
    pub fn from_raw(
        repositories: &[Value],
        teams: &[Value],
        repository_defaults: &RepositoryDefaults,
        team_defaults: &TeamDefaults,
    ) -> ReconcilerResult<Self> {
        let mut failures = Vec::new();

        let repositories = validate_all::<Repository>(repositories, &mut failures, |raw| {
            apply_repository_defaults(raw, repository_defaults)
        });
        let teams = validate_all::<Team>(teams, &mut failures, |raw| {
            apply_team_defaults(raw, team_defaults)
        });

        if !failures.is_empty() {
            return Err(ReconcilerError::InvalidDesiredResources(failures));
        }

        debug!(
            repositories = repositories.len(),
            teams = teams.len(),
            "Validated desired resources"
        );
        Ok(Self {
            repositories,
            teams,
        })
    }
}

fn validate_all<R: ManagedResource>(
    entries: &[Value],
    failures: &mut Vec<InvalidResource>,
    apply_defaults: impl Fn(&mut AttributeMap),
) -> Vec<R> {
    let key = R::KIND.identity_field();
    let mut resources = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let result = match entry {
            Value::Object(map) => {
                let mut map = map.clone();
                apply_defaults(&mut map);
                R::from_attributes(&map)
            }
            _ => Err(ValidationError::NotAnObject),
        };

        match result {
            Ok(resource) => resources.push(resource),
            Err(error) => {
                let identity = entry
                    .as_object()
                    .and_then(|map| identity_of(map, key))
                    .map(str::to_string);
                warn!(
                    kind = %R::KIND,
                    index,
                    identity = identity.as_deref().unwrap_or("<unnamed>"),
                    error = %error,
                    "Invalid desired resource"
                );
                failures.push(InvalidResource {
                    kind: R::KIND,
                    index,
                    identity,
                    error,
                });
            }
        }
    }

    resources
}
