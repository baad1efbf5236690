//! Reconciler configuration file.
//!
//! The configuration is stored in TOML format. Every key is optional; the
//! built-in defaults reproduce the conventional layout where the Terraform
//! state, the snapshot and the generated artifacts all live in `terraform/`.
//!
//! # Example TOML Configuration
//!
//! ```toml
//! template_dir = "templates"
//! output_dir = "terraform"
//! tfstate_file = "terraform.tfstate"
//! state_file = "existing_state.json"
//! baseline = "tfstate"
//!
//! [default_repository]
//! visibility = "public"
//!
//! [default_team]
//! privacy = "closed"
//! role = "member"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::resource_defaults::{RepositoryDefaults, TeamDefaults};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_OUTPUT_DIR: &str = "terraform";
const DEFAULT_TFSTATE_FILE: &str = "terraform.tfstate";
const DEFAULT_STATE_FILE: &str = "existing_state.json";

#[cfg(test)]
#[path = "reconciler_config_tests.rs"]
mod tests;

/// Where the last-known resource set is read from at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselineSource {
    /// Extract the baseline from the Terraform state file
    #[default]
    Tfstate,

    /// Use the snapshot written at the end of the previous run
    Snapshot,
}

/// Main configuration structure for the reconciler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcilerConfig {
    /// Directory holding `repository.tf.hbs` / `team.tf.hbs`. Built-in
    /// templates are used for any template not found here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,

    /// Directory that receives the generated artifacts
    pub output_dir: PathBuf,

    /// Terraform state file, relative to `output_dir` unless absolute
    pub tfstate_file: PathBuf,

    /// Snapshot file, relative to `output_dir` unless absolute
    pub state_file: PathBuf,

    pub baseline: BaselineSource,

    pub default_repository: RepositoryDefaults,

    pub default_team: TeamDefaults,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            template_dir: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            tfstate_file: PathBuf::from(DEFAULT_TFSTATE_FILE),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            baseline: BaselineSource::default(),
            default_repository: RepositoryDefaults::default(),
            default_team: TeamDefaults::default(),
        }
    }
}

impl ReconcilerConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if the file does not exist
    /// - `FileAccessError` if it cannot be read
    /// - `ParseError` for invalid TOML, unknown keys or unknown enum values
    /// - `InvalidConfiguration` if a path setting is empty
    pub fn load(path: &Path) -> ConfigurationResult<Self> {
        debug!(path = %path.display(), "Loading configuration");

        if !path.exists() {
            return Err(ConfigurationError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigurationError::FileAccessError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigurationResult<Self> {
        let config: ReconcilerConfig =
            toml::from_str(content).map_err(|e| ConfigurationError::ParseError {
                reason: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigurationResult<()> {
        debug!(path = %path.display(), "Saving configuration");

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigurationError::SerializeError {
                reason: e.to_string(),
            })?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConfigurationError::FileAccessError {
                    path: parent.display().to_string(),
                    reason: e.to_string(),
                })?;
            }
        }

        fs::write(path, content).map_err(|e| ConfigurationError::FileAccessError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Checks settings that serde cannot express.
    pub fn validate(&self) -> ConfigurationResult<()> {
        let paths = [
            ("output_dir", &self.output_dir),
            ("tfstate_file", &self.tfstate_file),
            ("state_file", &self.state_file),
        ];

        for (field, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ConfigurationError::InvalidConfiguration {
                    field: field.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Full path of the Terraform state file.
    pub fn tfstate_path(&self) -> PathBuf {
        self.output_dir.join(&self.tfstate_file)
    }

    /// Full path of the snapshot file.
    pub fn state_path(&self) -> PathBuf {
        self.output_dir.join(&self.state_file)
    }
}
