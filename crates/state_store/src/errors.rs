use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors reading or writing reconciliation state.
///
/// All of them are fatal to a run: without a known baseline every existing
/// resource would be misclassified.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("State file not found: {path}")]
    NotFound { path: String },

    #[error("Failed to read state file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write state file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse state file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Malformed state: {reason}")]
    Malformed { reason: String },

    #[error("Missing required key '{key}' in {resource_type} instance")]
    MissingKey { key: String, resource_type: String },
}

impl StateError {
    pub fn missing_key(key: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self::MissingKey {
            key: key.into(),
            resource_type: resource_type.into(),
        }
    }
}

/// Result type alias for state operations.
pub type StateResult<T> = Result<T, StateError>;
