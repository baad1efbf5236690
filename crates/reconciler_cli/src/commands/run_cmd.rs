//! The `run` and `plan` commands.
//!
//! A run goes through these stages, stopping at the first fatal error:
//!
//! 1. Load the configuration
//! 2. Parse and validate the desired repositories and teams
//! 3. Load the baseline (Terraform state or previous snapshot)
//! 4. Compute the change set
//! 5. Generate and remove artifacts, continuing past per-resource failures
//! 6. Save the desired state as the next snapshot, only if nothing failed
//!
//! `plan` stops after step 4 and prints the change set.

use std::path::PathBuf;

use clap::Args;
use config_manager::{BaselineSource, ReconcilerConfig};
use reconciler_core::{
    process_resources, ChangeSet, DesiredResources, ExistingState, ProcessingReport,
    TerraformArtifactWriter,
};
use serde_json::Value;
use state_store::{extract_resources, load_snapshot, load_tfstate, save_snapshot};
use tracing::{error, info, instrument, warn};

use crate::config::load_config;
use crate::errors::Error;

#[cfg(test)]
#[path = "run_cmd_tests.rs"]
mod tests;

/// Arguments shared by `run` and `plan`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory for generated artifacts, overriding the configuration
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Desired repositories as a JSON array
    #[arg(long, env = "REPOSITORIES", default_value = "[]")]
    pub repositories: String,

    /// Desired teams as a JSON array
    #[arg(long, env = "TEAMS", default_value = "[]")]
    pub teams: String,
}

/// Everything `run` and `plan` derive before touching artifacts.
#[derive(Debug)]
pub struct Reconciliation {
    pub config: ReconcilerConfig,
    pub desired: DesiredResources,
    pub change_set: ChangeSet,
}

/// Result of a completed `run`.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: ProcessingReport,

    /// Whether the next baseline was written
    pub snapshot_written: bool,
}

/// Parses one desired resource list.
pub fn parse_desired_list(name: &'static str, json: &str) -> Result<Vec<Value>, Error> {
    let value: Value = serde_json::from_str(json).map_err(|e| Error::DesiredInput {
        name,
        reason: e.to_string(),
    })?;

    match value {
        Value::Array(entries) => Ok(entries),
        _ => Err(Error::DesiredInput {
            name,
            reason: "expected a JSON array".to_string(),
        }),
    }
}

/// Loads the existing state from the configured baseline source.
pub fn load_baseline(config: &ReconcilerConfig) -> Result<ExistingState, Error> {
    let state = match config.baseline {
        BaselineSource::Tfstate => {
            let tfstate = load_tfstate(&config.tfstate_path())?;
            extract_resources(&tfstate)?
        }
        BaselineSource::Snapshot => load_snapshot(&config.state_path())?,
    };
    Ok(state)
}

/// Runs the stages shared by `run` and `plan`.
#[instrument(skip(args))]
pub fn prepare(args: &RunArgs) -> Result<Reconciliation, Error> {
    let config = load_config(args.config.as_deref(), args.output_dir.as_deref())?;

    let repositories = parse_desired_list("REPOSITORIES", &args.repositories)?;
    let teams = parse_desired_list("TEAMS", &args.teams)?;
    let desired = DesiredResources::from_raw(
        &repositories,
        &teams,
        &config.default_repository,
        &config.default_team,
    )?;

    let existing = load_baseline(&config)?;
    let change_set = ChangeSet::compute(&existing, &desired.repositories, &desired.teams)?;

    Ok(Reconciliation {
        config,
        desired,
        change_set,
    })
}

/// Executes a full reconciliation.
///
/// Per-resource failures do not make this an error. They are in the
/// returned report, and the snapshot is then left untouched so the next
/// run retries against the old baseline.
pub fn execute_run(args: &RunArgs) -> Result<RunOutcome, Error> {
    let Reconciliation {
        config,
        desired,
        change_set,
    } = prepare(args)?;

    let writer =
        TerraformArtifactWriter::load(config.template_dir.as_deref(), &config.output_dir)?;
    let report = process_resources(change_set, &writer, &writer);

    if !report.is_success() {
        warn!(
            failed = report.failed,
            "Resource failures occurred, snapshot not updated"
        );
        return Ok(RunOutcome {
            report,
            snapshot_written: false,
        });
    }

    let snapshot = ExistingState::from_desired(&desired.repositories, &desired.teams);
    save_snapshot(&snapshot, &config.state_path())?;

    Ok(RunOutcome {
        report,
        snapshot_written: true,
    })
}

/// Computes the change set without touching artifacts or the snapshot.
pub fn execute_plan(args: &RunArgs) -> Result<ChangeSet, Error> {
    Ok(prepare(args)?.change_set)
}

/// Human readable listing of a change set, one resource per line.
pub fn format_plan(change_set: &ChangeSet) -> String {
    if change_set.is_empty() {
        return "No changes.\n".to_string();
    }

    let mut lines = Vec::with_capacity(change_set.total() + 1);
    for r in &change_set.repos_to_add {
        lines.push(format!("+ repository {}", r.repository_name));
    }
    for r in &change_set.repos_to_update {
        lines.push(format!("~ repository {}", r.repository_name));
    }
    for r in &change_set.repos_to_delete {
        lines.push(format!("- repository {}", r.identity));
    }
    for t in &change_set.teams_to_add {
        lines.push(format!("+ team {}", t.team_name));
    }
    for t in &change_set.teams_to_update {
        lines.push(format!("~ team {}", t.team_name));
    }
    for t in &change_set.teams_to_delete {
        lines.push(format!("- team {}", t.identity));
    }

    lines.push(format!(
        "Plan: {} to add, {} to update, {} to delete.",
        change_set.repos_to_add.len() + change_set.teams_to_add.len(),
        change_set.repos_to_update.len() + change_set.teams_to_update.len(),
        change_set.repos_to_delete.len() + change_set.teams_to_delete.len(),
    ));

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

/// Prints the outcome of a run.
pub fn print_outcome(outcome: &RunOutcome) {
    let report = &outcome.report;
    println!(
        "Created: {}, Updated: {}, Deleted: {}, Already absent: {}, Failed: {}",
        report.created, report.updated, report.deleted, report.already_absent, report.failed
    );

    for failure in &report.failures {
        println!("Failed to {failure}");
    }

    if outcome.snapshot_written {
        info!("Run complete");
    } else {
        error!(failed = report.failed, "Run completed with failures");
    }
}
