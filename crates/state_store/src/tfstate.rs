//! Extracting the baseline from a Terraform state file.
//!
//! Only managed resources of the types the reconciler generates are read:
//!
//! | Resource type            | Becomes                                         |
//! |--------------------------|-------------------------------------------------|
//! | `github_repository`      | a repository entry                              |
//! | `github_team`            | a team entry                                    |
//! | `github_team_membership` | a `{username, role}` member of the matching team |
//!
//! Everything else, data sources included, is ignored.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use reconciler_core::{AttributeMap, ExistingState, REPOSITORY_KEY, TEAM_KEY};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::{StateError, StateResult};

#[cfg(test)]
#[path = "tfstate_tests.rs"]
mod tests;

const REPOSITORY_TYPE: &str = "github_repository";
const TEAM_TYPE: &str = "github_team";
const TEAM_MEMBERSHIP_TYPE: &str = "github_team_membership";
const DATA_MODE: &str = "data";

#[derive(Debug, Deserialize)]
struct TerraformState {
    #[serde(default)]
    resources: Vec<StateResource>,
}

#[derive(Debug, Deserialize)]
struct StateResource {
    #[serde(rename = "type")]
    resource_type: String,

    #[serde(default)]
    mode: Option<String>,

    #[serde(default)]
    instances: Vec<StateInstance>,
}

#[derive(Debug, Deserialize)]
struct StateInstance {
    #[serde(default)]
    attributes: AttributeMap,
}

/// Reads and parses a JSON document.
pub(crate) fn read_json(path: &Path) -> StateResult<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            StateError::NotFound {
                path: path.display().to_string(),
            }
        } else {
            StateError::Read {
                path: path.display().to_string(),
                source: e,
            }
        }
    })?;

    serde_json::from_str(&content).map_err(|e| StateError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

/// Loads the raw Terraform state document.
///
/// # Errors
///
/// - `StateError::NotFound` if the file does not exist
/// - `StateError::Read` if it cannot be read
/// - `StateError::Parse` if it is not JSON
pub fn load_tfstate(path: &Path) -> StateResult<Value> {
    debug!(path = %path.display(), "Loading Terraform state");
    read_json(path)
}

/// Extracts repositories and teams from a Terraform state document.
///
/// A document without `resources` is an empty state. Team memberships are
/// matched to their team by the team's `id` or `slug` and appended to its
/// members in state order; memberships of unknown teams are skipped.
///
/// # Errors
///
/// - `StateError::Malformed` if the document does not have the shape of a
///   Terraform state
/// - `StateError::MissingKey` if a recognised instance lacks a required
///   attribute
pub fn extract_resources(tfstate: &Value) -> StateResult<ExistingState> {
    let state = TerraformState::deserialize(tfstate).map_err(|e| StateError::Malformed {
        reason: e.to_string(),
    })?;

    let mut repositories = Vec::new();
    let mut teams = Vec::new();
    let mut team_lookup: HashMap<String, usize> = HashMap::new();
    let mut memberships = Vec::new();

    for resource in &state.resources {
        if resource.mode.as_deref() == Some(DATA_MODE) {
            continue;
        }

        for instance in &resource.instances {
            let attributes = &instance.attributes;
            match resource.resource_type.as_str() {
                REPOSITORY_TYPE => repositories.push(repository_entry(attributes)?),
                TEAM_TYPE => {
                    let index = teams.len();
                    for handle in ["id", "slug"] {
                        if let Some(value) = string_attribute(attributes, handle) {
                            team_lookup.insert(value.to_string(), index);
                        }
                    }
                    teams.push(team_entry(attributes)?);
                }
                TEAM_MEMBERSHIP_TYPE => memberships.push(membership_entry(attributes)?),
                _ => {}
            }
        }
    }

    for (team_id, member) in memberships {
        let Some(&index) = team_lookup.get(&team_id) else {
            warn!(team_id = %team_id, "Skipping membership of unknown team");
            continue;
        };
        if let Some(Value::Array(members)) = teams[index].get_mut("members") {
            members.push(member);
        }
    }

    info!(
        repositories = repositories.len(),
        teams = teams.len(),
        "Extracted existing resources from Terraform state"
    );
    Ok(ExistingState::new(repositories, teams))
}

fn repository_entry(attributes: &AttributeMap) -> StateResult<AttributeMap> {
    let mut entry = AttributeMap::new();
    entry.insert(
        REPOSITORY_KEY.to_string(),
        required_attribute(attributes, "name", REPOSITORY_TYPE)?,
    );
    entry.insert("description".to_string(), description(attributes));
    entry.insert(
        "visibility".to_string(),
        required_attribute(attributes, "visibility", REPOSITORY_TYPE)?,
    );
    if let Some(template) = string_attribute(attributes, "gitignore_template") {
        if !template.is_empty() {
            entry.insert(
                "gitignore_template".to_string(),
                Value::String(template.to_string()),
            );
        }
    }
    Ok(entry)
}

fn team_entry(attributes: &AttributeMap) -> StateResult<AttributeMap> {
    let mut entry = AttributeMap::new();
    entry.insert(
        TEAM_KEY.to_string(),
        required_attribute(attributes, "name", TEAM_TYPE)?,
    );
    entry.insert("description".to_string(), description(attributes));
    entry.insert(
        "privacy".to_string(),
        required_attribute(attributes, "privacy", TEAM_TYPE)?,
    );
    entry.insert("members".to_string(), Value::Array(Vec::new()));
    Ok(entry)
}

/// Returns the owning team handle and the member entry.
fn membership_entry(attributes: &AttributeMap) -> StateResult<(String, Value)> {
    let team_id = string_attribute(attributes, "team_id")
        .ok_or_else(|| StateError::missing_key("team_id", TEAM_MEMBERSHIP_TYPE))?;
    let username = required_attribute(attributes, "username", TEAM_MEMBERSHIP_TYPE)?;
    // The provider records "member" when no role was configured
    let role = string_attribute(attributes, "role").unwrap_or("member");

    let mut member = AttributeMap::new();
    member.insert("username".to_string(), username);
    member.insert("role".to_string(), Value::String(role.to_string()));
    Ok((team_id.to_string(), Value::Object(member)))
}

fn string_attribute<'a>(attributes: &'a AttributeMap, key: &str) -> Option<&'a str> {
    attributes.get(key).and_then(Value::as_str)
}

fn required_attribute(
    attributes: &AttributeMap,
    key: &str,
    resource_type: &str,
) -> StateResult<Value> {
    string_attribute(attributes, key)
        .map(|s| Value::String(s.to_string()))
        .ok_or_else(|| StateError::missing_key(key, resource_type))
}

fn description(attributes: &AttributeMap) -> Value {
    Value::String(
        string_attribute(attributes, "description")
            .unwrap_or_default()
            .to_string(),
    )
}
