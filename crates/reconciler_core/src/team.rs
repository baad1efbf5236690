//! Desired team resources and their members.

use config_manager::{MemberRole, TeamPrivacy};
use serde_json::Value;

use crate::errors::ValidationError;
use crate::resource::{
    check_identifier, empty_list, empty_string, null, optional_string, project_fields,
    required_enum, required_string, AttributeMap, ManagedResource, ResourceKind, TEAM_KEY,
};

#[cfg(test)]
#[path = "team_tests.rs"]
mod tests;

/// One member of a team.
///
/// Usernames are not checked for uniqueness within a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
    pub username: String,
    pub role: MemberRole,
}

impl TeamMember {
    pub fn new(username: impl Into<String>, role: MemberRole) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    fn to_value(&self) -> Value {
        let mut map = AttributeMap::new();
        map.insert("username".to_string(), Value::String(self.username.clone()));
        map.insert(
            "role".to_string(),
            Value::String(self.role.as_str().to_string()),
        );
        Value::Object(map)
    }

    fn from_value(raw: &Value) -> Result<Self, ValidationError> {
        let Value::Object(map) = raw else {
            return Err(ValidationError::NotAnObject);
        };

        let username = required_string(map, "username")?;
        check_identifier("username", &username)?;
        let role = required_enum::<MemberRole>(map, "role")?;

        Ok(Self { username, role })
    }

    fn sort_key(&self) -> (&str, &str) {
        (&self.username, self.role.as_str())
    }
}

/// Sort key of a member in attribute map form. Fields that are missing or
/// not strings sort first.
fn member_value_key(member: &Value) -> (&str, &str) {
    let field = |name: &str| member.get(name).and_then(Value::as_str).unwrap_or_default();
    (field("username"), field("role"))
}

/// A team as the user wants it to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub team_name: String,
    pub description: String,
    pub privacy: TeamPrivacy,

    /// Parsed teams hold their members sorted by username, then role.
    /// The attribute map form is always sorted that way.
    pub members: Vec<TeamMember>,
}

impl Team {
    pub fn new(name: impl Into<String>, privacy: TeamPrivacy) -> Self {
        Self {
            team_name: name.into(),
            description: String::new(),
            privacy,
            members: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_member(mut self, username: impl Into<String>, role: MemberRole) -> Self {
        self.members.push(TeamMember::new(username, role));
        self
    }
}

impl ManagedResource for Team {
    const KIND: ResourceKind = ResourceKind::Team;

    const FIELDS: &'static [(&'static str, fn() -> Value)] = &[
        (TEAM_KEY, null),
        ("description", empty_string),
        ("privacy", null),
        ("members", empty_list),
    ];

    fn identity(&self) -> &str {
        &self.team_name
    }

    fn to_attributes(&self) -> AttributeMap {
        let mut map = AttributeMap::new();
        map.insert(TEAM_KEY.to_string(), Value::String(self.team_name.clone()));
        map.insert(
            "description".to_string(),
            Value::String(self.description.clone()),
        );
        map.insert(
            "privacy".to_string(),
            Value::String(self.privacy.as_str().to_string()),
        );
        let mut members: Vec<&TeamMember> = self.members.iter().collect();
        members.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        map.insert(
            "members".to_string(),
            Value::Array(members.into_iter().map(TeamMember::to_value).collect()),
        );
        map
    }

    /// Validates a raw team entry, including every member.
    ///
    /// The first invalid member is reported with its index.
    fn from_attributes(raw: &AttributeMap) -> Result<Self, ValidationError> {
        let team_name = required_string(raw, TEAM_KEY)?;
        check_identifier(TEAM_KEY, &team_name)?;

        let description = optional_string(raw, "description")?.unwrap_or_default();
        let privacy = required_enum::<TeamPrivacy>(raw, "privacy")?;

        let mut members = match raw.get("members") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => entries
                .iter()
                .enumerate()
                .map(|(index, entry)| {
                    TeamMember::from_value(entry)
                        .map_err(|e| ValidationError::invalid_member(index, e))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(ValidationError::invalid_type("members", "a list")),
        };
        members.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        Ok(Self {
            team_name,
            description,
            privacy,
            members,
        })
    }

    /// Member lists compare without regard to order, so the existing
    /// members are sorted the way [`to_attributes`](Self::to_attributes)
    /// sorts them.
    fn canonical_existing(existing: &AttributeMap) -> AttributeMap {
        let mut projected = project_fields(Self::FIELDS, existing);
        if let Some(Value::Array(members)) = projected.get_mut("members") {
            members.sort_by(|a, b| member_value_key(a).cmp(&member_value_key(b)));
        }
        projected
    }
}
