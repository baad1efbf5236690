//! Configuration management for the Terraform reconciler.
//!
//! This crate owns the configuration file format, the defaults merged into
//! partially specified desired resources, and the enumerated access level
//! types shared by the rest of the workspace.

pub mod errors;
pub mod reconciler_config;
pub mod resource_defaults;
pub mod visibility;

// Re-export for convenient access
pub use errors::{ConfigurationError, ConfigurationResult};
pub use reconciler_config::{BaselineSource, ReconcilerConfig, DEFAULT_CONFIG_FILENAME};
pub use resource_defaults::{RepositoryDefaults, TeamDefaults};
pub use visibility::{MemberRole, RepositoryVisibility, TeamPrivacy, UnknownVariant};
