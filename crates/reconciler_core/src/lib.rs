//! # Reconciler Core
//!
//! This crate reconciles the desired GitHub repositories and teams against
//! the baseline recorded by the previous run, and applies the difference to
//! the generated Terraform artifacts.
//!
//! ## Overview
//!
//! One reconciliation run goes through these steps:
//! 1. Raw desired entries get configured defaults ([`apply_repository_defaults`],
//!    [`apply_team_defaults`]) and are validated ([`DesiredResources::from_raw`])
//! 2. Each kind is diffed against the [`ExistingState`] by its identity key
//!    ([`diff`]), and the results are bundled into a [`ChangeSet`]
//! 3. The [`ResourceProcessor`] generates or removes one artifact per changed
//!    resource, recording failures without stopping
//! 4. The caller persists [`ExistingState::from_desired`] as the next baseline
//!
//! Nothing here reads the environment or installs a tracing subscriber. All
//! paths and defaults are passed in explicitly.
//!
//! ## Examples
//!
//! ```no_run
//! use config_manager::{RepositoryDefaults, TeamDefaults};
//! use reconciler_core::{
//!     process_resources, ChangeSet, DesiredResources, ExistingState, TerraformArtifactWriter,
//! };
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let desired = DesiredResources::from_raw(
//!     &[json!({"repository_name": "repo1", "visibility": "private"})],
//!     &[],
//!     &RepositoryDefaults::default(),
//!     &TeamDefaults::default(),
//! )?;
//!
//! let existing = ExistingState::default();
//! let change_set = ChangeSet::compute(&existing, &desired.repositories, &desired.teams)?;
//!
//! let writer = TerraformArtifactWriter::load(None, "terraform")?;
//! let report = process_resources(change_set, &writer, &writer);
//! if !report.is_success() {
//!     eprintln!("{} resource(s) failed", report.failed);
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod changes;
pub mod defaults;
pub mod desired;
pub mod diff;
pub mod errors;
pub mod processor;
pub mod repository;
pub mod resource;
pub mod state;
pub mod team;

pub use artifacts::TerraformArtifactWriter;
pub use changes::ChangeSet;
pub use defaults::{apply_repository_defaults, apply_team_defaults};
pub use desired::DesiredResources;
pub use diff::{diff, ExistingResource, ResourceDiff};
pub use errors::{
    ArtifactError, DiffError, InvalidResource, ReconcilerError, ReconcilerResult, ValidationError,
};
pub use processor::{
    process_resources, ArtifactGenerator, ArtifactRemover, ProcessingReport, Removal,
    ResourceAction, ResourceFailure, ResourceProcessor,
};
pub use repository::Repository;
pub use resource::{AttributeMap, ManagedResource, ResourceKind, REPOSITORY_KEY, TEAM_KEY};
pub use state::ExistingState;
pub use team::{Team, TeamMember};

// Re-export the enumerated value types so callers need only this crate
pub use config_manager::{MemberRole, RepositoryVisibility, TeamPrivacy};
