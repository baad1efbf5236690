//! Error types for the reconciliation core.
//!
//! The taxonomy follows how each failure propagates:
//!
//! - [`ValidationError`]: a desired resource entry is unusable. Collected for
//!   every entry, then the run aborts before any processing.
//! - [`DiffError`]: an identity key is missing where the diff needs it. A
//!   contract violation, never recovered.
//! - [`ArtifactError`]: one resource's artifact could not be generated or
//!   removed. Recorded by the processor, siblings keep going.
//! - [`ReconcilerError`]: the umbrella for callers that want one type.

use thiserror::Error;

use crate::resource::ResourceKind;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// A desired resource failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field '{field}' is missing")]
    MissingField { field: String },

    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },

    #[error("Field '{field}' has invalid value '{value}': expected one of {}", .allowed.join(", "))]
    InvalidEnumValue {
        field: String,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Member at index {index} is invalid: {source}")]
    InvalidMember {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },

    #[error("Resource entry must be a JSON object")]
    NotAnObject,
}

impl ValidationError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn empty_field(field: impl Into<String>) -> Self {
        Self::EmptyField {
            field: field.into(),
        }
    }

    pub fn invalid_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidType {
            field: field.into(),
            expected,
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_member(index: usize, source: ValidationError) -> Self {
        Self::InvalidMember {
            index,
            source: Box::new(source),
        }
    }
}

/// One rejected entry of the desired resource lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidResource {
    pub kind: ResourceKind,

    /// Position of the entry in its input list
    pub index: usize,

    /// The entry's identity key, when it had a usable one
    pub identity: Option<String>,

    pub error: ValidationError,
}

impl std::fmt::Display for InvalidResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.identity {
            Some(identity) => write!(
                f,
                "{} '{}' (index {}): {}",
                self.kind, identity, self.index, self.error
            ),
            None => write!(f, "{} at index {}: {}", self.kind, self.index, self.error),
        }
    }
}

/// The identity key required by the diff is absent or not a string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error("Missing required key '{key}' in existing resource at index {index}")]
    MissingExistingKey { key: String, index: usize },

    #[error("Missing required key '{key}' in desired resource at index {index}")]
    MissingDesiredKey { key: String, index: usize },
}

/// A single artifact could not be generated or removed.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to render artifact for {kind} '{identity}': {source}")]
    Render {
        kind: ResourceKind,
        identity: String,
        #[source]
        source: template_engine::Error,
    },

    #[error("Cannot address artifact for {kind} '{identity}': {source}")]
    InvalidName {
        kind: ResourceKind,
        identity: String,
        #[source]
        source: template_engine::Error,
    },

    #[error("Artifact I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error for reconciliation operations.
#[derive(Error, Debug)]
pub enum ReconcilerError {
    #[error("{} desired resource(s) failed validation", .0.len())]
    InvalidDesiredResources(Vec<InvalidResource>),

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error("Failed to prepare artifact templates: {0}")]
    Template(#[from] template_engine::Error),
}

/// Result type alias for reconciliation operations.
pub type ReconcilerResult<T> = Result<T, ReconcilerError>;
