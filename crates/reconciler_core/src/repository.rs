//! Desired repository resources.

use config_manager::RepositoryVisibility;
use serde_json::Value;

use crate::errors::ValidationError;
use crate::resource::{
    check_identifier, empty_string, null, optional_string, required_enum, required_string,
    AttributeMap, ManagedResource, ResourceKind, REPOSITORY_KEY,
};

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;

/// Placeholder some callers use for "no gitignore template".
const NO_GITIGNORE_TEMPLATE: &str = "None";

/// A repository as the user wants it to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub repository_name: String,
    pub description: String,
    pub visibility: RepositoryVisibility,
    pub gitignore_template: Option<String>,
}

impl Repository {
    pub fn new(name: impl Into<String>, visibility: RepositoryVisibility) -> Self {
        Self {
            repository_name: name.into(),
            description: String::new(),
            visibility,
            gitignore_template: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_gitignore_template(mut self, template: impl Into<String>) -> Self {
        self.gitignore_template = Some(template.into());
        self
    }
}

impl ManagedResource for Repository {
    const KIND: ResourceKind = ResourceKind::Repository;

    const FIELDS: &'static [(&'static str, fn() -> Value)] = &[
        (REPOSITORY_KEY, null),
        ("description", empty_string),
        ("visibility", null),
        ("gitignore_template", null),
    ];

    fn identity(&self) -> &str {
        &self.repository_name
    }

    fn to_attributes(&self) -> AttributeMap {
        let mut map = AttributeMap::new();
        map.insert(
            REPOSITORY_KEY.to_string(),
            Value::String(self.repository_name.clone()),
        );
        map.insert(
            "description".to_string(),
            Value::String(self.description.clone()),
        );
        map.insert(
            "visibility".to_string(),
            Value::String(self.visibility.as_str().to_string()),
        );
        map.insert(
            "gitignore_template".to_string(),
            self.gitignore_template
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
        );
        map
    }

    /// Validates a raw repository entry.
    ///
    /// `description` defaults to empty. A `gitignore_template` that is empty
    /// or the literal `"None"` means no template. Unknown fields are ignored.
    fn from_attributes(raw: &AttributeMap) -> Result<Self, ValidationError> {
        let repository_name = required_string(raw, REPOSITORY_KEY)?;
        check_identifier(REPOSITORY_KEY, &repository_name)?;

        let description = optional_string(raw, "description")?.unwrap_or_default();
        let visibility = required_enum::<RepositoryVisibility>(raw, "visibility")?;
        let gitignore_template = optional_string(raw, "gitignore_template")?
            .filter(|t| !t.is_empty() && t != NO_GITIGNORE_TEMPLATE);

        Ok(Self {
            repository_name,
            description,
            visibility,
            gitignore_template,
        })
    }
}
