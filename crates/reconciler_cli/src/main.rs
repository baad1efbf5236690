use clap::{Parser, Subcommand};
use reconciler_cli::commands::config_cmd::{self, ConfigCommands};
use reconciler_cli::commands::run_cmd::{
    execute_plan, execute_run, format_plan, print_outcome, RunArgs,
};
use reconciler_cli::errors::{Error, EXIT_RESOURCE_FAILURES, EXIT_SUCCESS};
use reconciler_core::ReconcilerError;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter
const LOG_ENV: &str = "TF_RECONCILER_LOG";

/// Terraform reconciler: generate Terraform for GitHub repositories and teams
#[derive(Parser)]
#[command(name = "tf-reconciler")]
#[command(about = "Reconcile desired GitHub repositories and teams with Terraform state", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile: regenerate changed artifacts and save the new snapshot
    Run(RunArgs),

    /// Show what a run would change without writing anything
    Plan(RunArgs),

    /// Create or check the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show the CLI version
    Version,
}

fn report_error(e: &Error) -> i32 {
    error!("Error: {e}");
    eprintln!("Error: {e}");

    if let Error::Reconcile(ReconcilerError::InvalidDesiredResources(failures)) = e {
        for failure in failures {
            eprintln!("  {failure}");
        }
    }

    e.exit_code()
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let code = match &cli.command {
        Commands::Run(args) => match execute_run(args) {
            Ok(outcome) => {
                print_outcome(&outcome);
                if outcome.report.is_success() {
                    EXIT_SUCCESS
                } else {
                    EXIT_RESOURCE_FAILURES
                }
            }
            Err(e) => report_error(&e),
        },
        Commands::Plan(args) => match execute_plan(args) {
            Ok(change_set) => {
                print!("{}", format_plan(&change_set));
                EXIT_SUCCESS
            }
            Err(e) => report_error(&e),
        },
        Commands::Config(cmd) => match config_cmd::execute(cmd) {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => report_error(&e),
        },
        Commands::Version => {
            // Print version info from baked-in value
            println!(
                "tf-reconciler version {}",
                option_env!("TF_RECONCILER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
            );
            EXIT_SUCCESS
        }
    };

    std::process::exit(code);
}
