use clap::Subcommand;
use config_manager::ReconcilerConfig;
use tracing::{debug, error, info, instrument};

use crate::config::get_config_path;
use crate::errors::Error;

#[cfg(test)]
#[path = "config_cmd_tests.rs"]
mod tests;

/// Subcommands for the config command
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create initial configuration file
    Init {
        /// Path to save the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Check configuration syntax
    Validate {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },
}

/// Execute the config command
#[instrument]
pub fn execute(cmd: &ConfigCommands) -> Result<(), Error> {
    match cmd {
        ConfigCommands::Init { path } => init_config(path.as_deref()),
        ConfigCommands::Validate { path } => validate_config(path.as_deref()).map(|_| ()),
    }
}

/// Initialize a new configuration file with the built-in defaults
#[instrument]
pub fn init_config(path: Option<&str>) -> Result<(), Error> {
    let config_path = get_config_path(path);
    debug!(path = %config_path.display(), "Initializing configuration");

    if config_path.exists() {
        let err = Error::ConfigExists {
            path: config_path.display().to_string(),
        };
        error!(path = %config_path.display(), "Configuration file already exists");
        return Err(err);
    }

    ReconcilerConfig::default().save(&config_path)?;

    info!(path = %config_path.display(), "Configuration initialized");
    println!("Configuration initialized at {}", config_path.display());
    Ok(())
}

/// Validate a configuration file
#[instrument]
pub fn validate_config(path: Option<&str>) -> Result<ReconcilerConfig, Error> {
    let config_path = get_config_path(path);
    debug!(path = %config_path.display(), "Validating configuration");

    match ReconcilerConfig::load(&config_path) {
        Ok(config) => {
            info!(path = %config_path.display(), "Configuration is valid");
            println!("Configuration is valid");
            Ok(config)
        }
        Err(e) => {
            error!(path = %config_path.display(), error = %e, "Configuration is invalid");
            Err(e.into())
        }
    }
}
