//! Defaulting step applied to raw desired entries before validation.
//!
//! Configured defaults only fill fields that are absent or `null`. Provided
//! values are never overwritten, and the identity key is never invented, so
//! an entry without a name still fails validation.

use config_manager::{RepositoryDefaults, TeamDefaults};
use serde_json::Value;
use tracing::trace;

use crate::resource::AttributeMap;

#[cfg(test)]
#[path = "defaults_tests.rs"]
mod tests;

/// Fills unset repository fields from `defaults`.
pub fn apply_repository_defaults(raw: &mut AttributeMap, defaults: &RepositoryDefaults) {
    fill(
        raw,
        "visibility",
        defaults.visibility.map(|v| v.as_str().to_string()),
    );
    fill(raw, "description", defaults.description.clone());
    fill(
        raw,
        "gitignore_template",
        defaults.gitignore_template.clone(),
    );
}

/// Fills unset team fields from `defaults`, including each member's role.
///
/// Member entries that are not objects are left alone for validation to
/// reject.
pub fn apply_team_defaults(raw: &mut AttributeMap, defaults: &TeamDefaults) {
    fill(raw, "privacy", defaults.privacy.map(|p| p.as_str().to_string()));
    fill(raw, "description", defaults.description.clone());

    let Some(role) = defaults.role else {
        return;
    };
    if let Some(Value::Array(members)) = raw.get_mut("members") {
        for member in members.iter_mut() {
            if let Value::Object(member) = member {
                fill(member, "role", Some(role.as_str().to_string()));
            }
        }
    }
}

fn fill(raw: &mut AttributeMap, field: &str, default: Option<String>) {
    let Some(default) = default else {
        return;
    };

    let unset = raw.get(field).map_or(true, Value::is_null);
    if unset {
        trace!(field, value = %default, "Applying default");
        raw.insert(field.to_string(), Value::String(default));
    }
}
