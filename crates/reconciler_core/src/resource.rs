//! Common vocabulary for the managed resource kinds.
//!
//! Desired resources are strongly typed ([`Repository`](crate::Repository),
//! [`Team`](crate::Team)); existing resources are the loosely typed attribute
//! maps recorded by the previous run. [`ManagedResource`] is the bridge the
//! diff engine works with: it converts a typed resource into its attribute
//! map, and projects an existing map onto the same canonical shape so the
//! two can be compared field by field.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ValidationError;

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;

/// Plain attribute map form of a resource.
///
/// Backed by a sorted map, so conversion and serialization are stable.
pub type AttributeMap = Map<String, Value>;

/// Identity key of repositories.
pub const REPOSITORY_KEY: &str = "repository_name";

/// Identity key of teams.
pub const TEAM_KEY: &str = "team_name";

/// The two kinds of resource the reconciler manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Repository,
    Team,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repository => "repository",
            Self::Team => "team",
        }
    }

    /// Field that identifies a resource of this kind across runs.
    pub fn identity_field(&self) -> &'static str {
        match self {
            Self::Repository => REPOSITORY_KEY,
            Self::Team => TEAM_KEY,
        }
    }

    /// Suffix of the artifact name: `R_repository`, `T_team`.
    pub fn artifact_suffix(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strongly typed desired resource.
pub trait ManagedResource: Clone + PartialEq + fmt::Debug {
    /// Kind of this resource
    const KIND: ResourceKind;

    /// Every field of the attribute map form, paired with the value an
    /// existing entry is assumed to hold when the field was not recorded.
    /// Required fields use `Value::Null`, which never equals a valid value.
    const FIELDS: &'static [(&'static str, fn() -> Value)];

    /// Value of the identity key.
    fn identity(&self) -> &str;

    /// Deterministic conversion to the attribute map form. Includes every
    /// field in [`FIELDS`](Self::FIELDS), defaulted ones included.
    fn to_attributes(&self) -> AttributeMap;

    /// Validates a raw attribute map and builds the resource.
    fn from_attributes(raw: &AttributeMap) -> Result<Self, ValidationError>;

    /// Parses a raw JSON value, rejecting anything that is not an object.
    fn parse(raw: &Value) -> Result<Self, ValidationError> {
        match raw {
            Value::Object(map) => Self::from_attributes(map),
            _ => Err(ValidationError::NotAnObject),
        }
    }

    /// Projects an existing entry onto this kind's fields, filling fields
    /// that were not recorded and dropping fields this kind does not know.
    fn canonical_existing(existing: &AttributeMap) -> AttributeMap {
        project_fields(Self::FIELDS, existing)
    }
}

/// Keeps exactly `fields` of `existing`, with `null` or absent values
/// replaced by the field's default.
pub(crate) fn project_fields(
    fields: &[(&'static str, fn() -> Value)],
    existing: &AttributeMap,
) -> AttributeMap {
    fields
        .iter()
        .map(|(field, default)| {
            let value = existing
                .get(*field)
                .filter(|v| !v.is_null())
                .cloned()
                .unwrap_or_else(default);
            (field.to_string(), value)
        })
        .collect()
}

pub(crate) fn null() -> Value {
    Value::Null
}

pub(crate) fn empty_string() -> Value {
    Value::String(String::new())
}

pub(crate) fn empty_list() -> Value {
    Value::Array(Vec::new())
}

// ================================
// Raw field accessors
// ================================

/// Reads a required, non-empty string field.
pub(crate) fn required_string(raw: &AttributeMap, field: &str) -> Result<String, ValidationError> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(ValidationError::missing_field(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ValidationError::empty_field(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ValidationError::invalid_type(field, "a string")),
    }
}

/// Reads an optional string field. `null` and absence are both `None`.
pub(crate) fn optional_string(
    raw: &AttributeMap,
    field: &str,
) -> Result<Option<String>, ValidationError> {
    match raw.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::invalid_type(field, "a string")),
    }
}

/// Reads a required enumerated field through its `FromStr` impl.
pub(crate) fn required_enum<T>(raw: &AttributeMap, field: &str) -> Result<T, ValidationError>
where
    T: std::str::FromStr<Err = config_manager::UnknownVariant>,
{
    let value = match raw.get(field) {
        None | Some(Value::Null) => return Err(ValidationError::missing_field(field)),
        Some(Value::String(s)) => s,
        Some(_) => return Err(ValidationError::invalid_type(field, "a string")),
    };

    value
        .parse::<T>()
        .map_err(|e| ValidationError::InvalidEnumValue {
            field: field.to_string(),
            value: e.value,
            allowed: e.allowed,
        })
}

/// Checks that an identifier can safely address an artifact on disk.
pub(crate) fn check_identifier(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.contains('/') || value.contains('\\') {
        return Err(ValidationError::invalid_format(
            field,
            "must not contain path separators",
        ));
    }

    if value.contains("..") {
        return Err(ValidationError::invalid_format(field, "must not contain '..'"));
    }

    if value.contains(':') {
        return Err(ValidationError::invalid_format(field, "must not contain ':'"));
    }

    if value.chars().any(char::is_control) {
        return Err(ValidationError::invalid_format(
            field,
            "must not contain control characters",
        ));
    }

    Ok(())
}

/// Reads the identity key of a raw entry, if it is a string.
pub(crate) fn identity_of<'a>(raw: &'a AttributeMap, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str)
}
