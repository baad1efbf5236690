//! Three-way partition of desired resources against the recorded baseline.
//!
//! The diff is run once per resource kind. Existing entries are matched to
//! desired resources by the value of a caller-supplied identity key; a
//! matched pair whose canonical attribute maps differ in any field is an
//! update of the whole resource.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, info};

use crate::errors::DiffError;
use crate::resource::{AttributeMap, ManagedResource};

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;

/// An existing entry with no desired counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingResource {
    pub identity: String,
    pub attributes: AttributeMap,
}

/// Result of diffing one resource kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDiff<R> {
    pub to_add: Vec<R>,

    /// Carries the desired values
    pub to_update: Vec<R>,

    /// Carries the existing values
    pub to_delete: Vec<ExistingResource>,
}

impl<R> ResourceDiff<R> {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }
}

impl<R> Default for ResourceDiff<R> {
    fn default() -> Self {
        Self {
            to_add: Vec::new(),
            to_update: Vec::new(),
            to_delete: Vec::new(),
        }
    }
}

/// Partitions `desired` against `existing` by the `key` field.
///
/// - desired key not in existing: added
/// - key in both, canonical maps differ: updated, with the desired values
/// - key in both, maps equal: nothing
/// - existing key no desired resource references: deleted
///
/// When `existing` holds the same key more than once the last entry wins.
/// Duplicate desired keys are passed through as they are. Output keeps
/// input order: desired order for additions and updates, existing order
/// for deletions.
///
/// # Errors
///
/// [`DiffError`] if `key` is absent from, or not a string in, any existing
/// entry or the attribute map of any desired resource.
pub fn diff<R: ManagedResource>(
    existing: &[AttributeMap],
    desired: &[R],
    key: &str,
) -> Result<ResourceDiff<R>, DiffError> {
    let mut lookup: HashMap<&str, usize> = HashMap::with_capacity(existing.len());
    for (index, entry) in existing.iter().enumerate() {
        let identity = string_key(entry, key).ok_or_else(|| DiffError::MissingExistingKey {
            key: key.to_string(),
            index,
        })?;
        lookup.insert(identity, index);
    }

    let mut result = ResourceDiff::default();
    let mut referenced: HashSet<String> = HashSet::with_capacity(desired.len());

    for (index, resource) in desired.iter().enumerate() {
        let attributes = resource.to_attributes();
        let identity = string_key(&attributes, key).ok_or_else(|| DiffError::MissingDesiredKey {
            key: key.to_string(),
            index,
        })?;

        match lookup.get(identity) {
            None => {
                debug!(kind = %R::KIND, identity, "Resource to add");
                result.to_add.push(resource.clone());
            }
            Some(&existing_index) => {
                let current = R::canonical_existing(&existing[existing_index]);
                if current != attributes {
                    debug!(kind = %R::KIND, identity, "Resource to update");
                    result.to_update.push(resource.clone());
                }
            }
        }

        referenced.insert(identity.to_string());
    }

    for (index, entry) in existing.iter().enumerate() {
        let Some(identity) = string_key(entry, key) else {
            continue;
        };
        // Only the winning entry of a duplicated key is considered.
        if lookup.get(identity) != Some(&index) || referenced.contains(identity) {
            continue;
        }

        debug!(kind = %R::KIND, identity, "Resource to delete");
        result.to_delete.push(ExistingResource {
            identity: identity.to_string(),
            attributes: entry.clone(),
        });
    }

    info!(
        kind = %R::KIND,
        to_add = result.to_add.len(),
        to_update = result.to_update.len(),
        to_delete = result.to_delete.len(),
        "Computed resource diff"
    );
    Ok(result)
}

fn string_key<'a>(map: &'a AttributeMap, key: &str) -> Option<&'a str> {
    match map.get(key) {
        Some(Value::String(s)) => Some(s.as_str()),
        _ => None,
    }
}
