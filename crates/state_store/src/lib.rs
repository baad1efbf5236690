//! State storage for the Terraform reconciler.
//!
//! This crate reads the baseline a run diffs against, either from a
//! Terraform state file ([`load_tfstate`] + [`extract_resources`]) or from
//! the flat snapshot written by the previous run ([`load_snapshot`]), and
//! persists the new snapshot at the end of a run ([`save_snapshot`]).

mod errors;
pub mod snapshot;
pub mod tfstate;

pub use errors::{StateError, StateResult};
pub use snapshot::{load_snapshot, save_snapshot};
pub use tfstate::{extract_resources, load_tfstate};
