//! Command modules for the reconciler CLI.
//!
//! - `config_cmd`: configuration file management
//! - `run_cmd`: the `run` and `plan` reconciliation commands

pub mod config_cmd;
pub mod run_cmd;
