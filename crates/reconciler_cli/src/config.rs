//! Configuration resolution for the reconciler CLI.
//!
//! The configuration file is looked up at `--config` when given, otherwise
//! as `config.toml` in the current directory. Only an explicitly given file
//! has to exist; without one the built-in defaults apply.

use std::path::{Path, PathBuf};

use config_manager::{ReconcilerConfig, DEFAULT_CONFIG_FILENAME};
use tracing::{debug, info};

use crate::errors::Error;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Returns the configuration file path to use.
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        // Look for config in current directory
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}

/// Loads the configuration for a reconciliation command.
///
/// `output_dir` replaces the configured output directory when given.
///
/// # Errors
///
/// Returns `Error::Config` if an explicitly given file is missing, or if
/// the file that was found is invalid.
pub fn load_config(
    config_path: Option<&str>,
    output_dir: Option<&Path>,
) -> Result<ReconcilerConfig, Error> {
    let path = get_config_path(config_path);

    let mut config = if config_path.is_none() && !path.exists() {
        debug!(path = %path.display(), "No configuration file, using defaults");
        ReconcilerConfig::default()
    } else {
        ReconcilerConfig::load(&path)?
    };

    if let Some(dir) = output_dir {
        debug!(output_dir = %dir.display(), "Overriding output directory");
        config.output_dir = dir.to_path_buf();
    }

    info!(
        output_dir = %config.output_dir.display(),
        baseline = ?config.baseline,
        "Configuration loaded"
    );
    Ok(config)
}
