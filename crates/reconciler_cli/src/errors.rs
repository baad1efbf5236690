use config_manager::ConfigurationError;
use reconciler_core::{DiffError, ReconcilerError};
use state_store::StateError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Exit code for a run where every resource was processed.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for a run where one or more resources failed.
pub const EXIT_RESOURCE_FAILURES: i32 = 1;

/// Exit code for a run aborted by a fatal error.
pub const EXIT_FATAL: i32 = 2;

/// Errors that abort a CLI command.
///
/// Per-resource failures are not errors: they are reported through the
/// processing report and end the run with [`EXIT_RESOURCE_FAILURES`].
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file is missing, unreadable or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigurationError),

    /// `config init` would overwrite an existing file.
    #[error("Configuration file already exists at {path}")]
    ConfigExists { path: String },

    /// A desired resource list is not a JSON array.
    #[error("Invalid {name} input: {reason}")]
    DesiredInput { name: &'static str, reason: String },

    /// Desired resources failed validation, or artifacts could not be prepared.
    #[error(transparent)]
    Reconcile(#[from] ReconcilerError),

    /// The baseline violates the identity key contract.
    #[error("Invalid baseline: {0}")]
    Diff(#[from] DiffError),

    /// The baseline could not be read or the snapshot could not be written.
    #[error("State error: {0}")]
    State(#[from] StateError),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        EXIT_FATAL
    }
}
