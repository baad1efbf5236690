//! Applying a change set to the generated artifacts.
//!
//! The [`ResourceProcessor`] walks a [`ChangeSet`] and calls the injected
//! [`ArtifactGenerator`] for additions and updates and the injected
//! [`ArtifactRemover`] for deletions. A failing resource is recorded in the
//! [`ProcessingReport`] and processing moves on to the next one; nothing is
//! rolled back.
//!
//! Order is fixed: repositories before teams, and within a kind additions,
//! then updates, then deletions, each in change set order.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::changes::ChangeSet;
use crate::diff::ExistingResource;
use crate::errors::ArtifactError;
use crate::repository::Repository;
use crate::resource::{ManagedResource, ResourceKind};
use crate::team::Team;

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;

/// Writes the artifact for a resource's desired state.
///
/// Implementations must be idempotent: generating the same resource twice
/// leaves the same artifact in place. Calls for different identities must
/// not interfere with each other.
pub trait ArtifactGenerator: Send + Sync {
    /// Writes the `R_repository` artifact and returns where it went.
    fn generate_repository(&self, repository: &Repository) -> Result<PathBuf, ArtifactError>;

    /// Writes the `T_team` artifact and returns where it went.
    fn generate_team(&self, team: &Team) -> Result<PathBuf, ArtifactError>;
}

/// Removes the artifact of a resource by identity.
pub trait ArtifactRemover: Send + Sync {
    fn remove(&self, kind: ResourceKind, identity: &str) -> Result<Removal, ArtifactError>;
}

/// Outcome of a successful removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    Removed(PathBuf),

    /// There was nothing to remove. Not an error.
    NotFound(PathBuf),
}

/// What the processor attempted for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAction {
    Create,
    Update,
    Delete,
}

impl fmt::Display for ResourceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// A single resource whose artifact operation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFailure {
    pub kind: ResourceKind,
    pub identity: String,
    pub action: ResourceAction,

    /// Rendered error message
    pub reason: String,
}

impl fmt::Display for ResourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} '{}': {}",
            self.action, self.kind, self.identity, self.reason
        )
    }
}

/// Result of processing a change set.
///
/// Contains counters for the different outcomes of artifact operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingReport {
    /// Artifacts generated for added resources
    pub created: usize,

    /// Artifacts regenerated for updated resources
    pub updated: usize,

    /// Artifacts removed for deleted resources
    pub deleted: usize,

    /// Deletions whose artifact did not exist
    pub already_absent: usize,

    /// Operations that failed
    pub failed: usize,

    /// Details of every failed operation, in processing order
    pub failures: Vec<ResourceFailure>,
}

impl ProcessingReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no resource operation failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Number of operations that succeeded.
    pub fn succeeded(&self) -> usize {
        self.created + self.updated + self.deleted + self.already_absent
    }

    fn record_failure(
        &mut self,
        kind: ResourceKind,
        identity: &str,
        action: ResourceAction,
        error: &ArtifactError,
    ) {
        warn!(
            kind = %kind,
            identity,
            action = %action,
            error = %error,
            "Resource operation failed"
        );
        self.failed += 1;
        self.failures.push(ResourceFailure {
            kind,
            identity: identity.to_string(),
            action,
            reason: error.to_string(),
        });
    }
}

/// Applies change sets through injected artifact capabilities.
pub struct ResourceProcessor<'a> {
    generator: &'a dyn ArtifactGenerator,
    remover: &'a dyn ArtifactRemover,
}

impl<'a> ResourceProcessor<'a> {
    pub fn new(generator: &'a dyn ArtifactGenerator, remover: &'a dyn ArtifactRemover) -> Self {
        Self { generator, remover }
    }

    /// Processes every action in `change_set`, consuming it.
    ///
    /// Never stops early. Callers decide the overall outcome from
    /// [`ProcessingReport::is_success`].
    pub fn process(&self, change_set: ChangeSet) -> ProcessingReport {
        info!(actions = change_set.total(), "Processing change set");

        let mut report = ProcessingReport::new();

        self.generate_all(
            &change_set.repos_to_add,
            ResourceAction::Create,
            &mut report,
            |r| self.generator.generate_repository(r),
        );
        self.generate_all(
            &change_set.repos_to_update,
            ResourceAction::Update,
            &mut report,
            |r| self.generator.generate_repository(r),
        );
        self.remove_all(
            ResourceKind::Repository,
            &change_set.repos_to_delete,
            &mut report,
        );

        self.generate_all(
            &change_set.teams_to_add,
            ResourceAction::Create,
            &mut report,
            |t| self.generator.generate_team(t),
        );
        self.generate_all(
            &change_set.teams_to_update,
            ResourceAction::Update,
            &mut report,
            |t| self.generator.generate_team(t),
        );
        self.remove_all(ResourceKind::Team, &change_set.teams_to_delete, &mut report);

        info!(
            created = report.created,
            updated = report.updated,
            deleted = report.deleted,
            already_absent = report.already_absent,
            failed = report.failed,
            "Change set processing complete"
        );
        report
    }

    fn generate_all<R: ManagedResource>(
        &self,
        resources: &[R],
        action: ResourceAction,
        report: &mut ProcessingReport,
        generate: impl Fn(&R) -> Result<PathBuf, ArtifactError>,
    ) {
        for resource in resources {
            let identity = resource.identity();
            match generate(resource) {
                Ok(path) => {
                    info!(
                        kind = %R::KIND,
                        identity,
                        action = %action,
                        path = %path.display(),
                        "Generated artifact"
                    );
                    match action {
                        ResourceAction::Update => report.updated += 1,
                        _ => report.created += 1,
                    }
                }
                Err(e) => report.record_failure(R::KIND, identity, action, &e),
            }
        }
    }

    fn remove_all(
        &self,
        kind: ResourceKind,
        resources: &[ExistingResource],
        report: &mut ProcessingReport,
    ) {
        for resource in resources {
            let identity = resource.identity.as_str();
            match self.remover.remove(kind, identity) {
                Ok(Removal::Removed(path)) => {
                    info!(kind = %kind, identity, path = %path.display(), "Removed artifact");
                    report.deleted += 1;
                }
                Ok(Removal::NotFound(path)) => {
                    debug!(
                        kind = %kind,
                        identity,
                        path = %path.display(),
                        "Artifact already absent"
                    );
                    report.already_absent += 1;
                }
                Err(e) => report.record_failure(kind, identity, ResourceAction::Delete, &e),
            }
        }
    }
}

/// Processes `change_set` with the given capabilities.
pub fn process_resources(
    change_set: ChangeSet,
    generator: &dyn ArtifactGenerator,
    remover: &dyn ArtifactRemover,
) -> ProcessingReport {
    ResourceProcessor::new(generator, remover).process(change_set)
}
