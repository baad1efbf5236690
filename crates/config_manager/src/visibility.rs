//! Visibility and access level types shared across the workspace.
//!
//! These enumerations are defined here, in config_manager, so that both the
//! configuration defaults and the resource model in reconciler_core can use
//! them without a circular dependency. reconciler_core re-exports them.
//!
//! Every type serializes to and from its lowercase GitHub name and rejects
//! anything else. Parsing from a string goes through [`std::str::FromStr`]
//! and reports the offending value together with the accepted set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(test)]
#[path = "visibility_tests.rs"]
mod tests;

/// A string that does not name any variant of an enumerated setting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not one of: {}", .allowed.join(", "))]
pub struct UnknownVariant {
    /// The rejected input
    pub value: String,

    /// The accepted values, in declaration order
    pub allowed: &'static [&'static str],
}

/// Repository visibility level (GitHub platform concept).
///
/// Internal visibility is only available in GitHub Enterprise environments.
///
/// # Examples
///
/// ```rust
/// use config_manager::RepositoryVisibility;
///
/// let visibility: RepositoryVisibility = "internal".parse().unwrap();
/// assert_eq!(visibility, RepositoryVisibility::Internal);
/// assert!("secret".parse::<RepositoryVisibility>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryVisibility {
    /// Visible to all GitHub users
    Public,

    /// Visible only to repository collaborators
    Private,

    /// Visible to all organization/enterprise members (GitHub Enterprise only)
    Internal,
}

impl RepositoryVisibility {
    /// Accepted string forms.
    pub const VARIANTS: &'static [&'static str] = &["public", "private", "internal"];

    /// Convert visibility to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Internal => "internal",
        }
    }
}

impl FromStr for RepositoryVisibility {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            "internal" => Ok(Self::Internal),
            other => Err(UnknownVariant {
                value: other.to_string(),
                allowed: Self::VARIANTS,
            }),
        }
    }
}

impl fmt::Display for RepositoryVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Team privacy level.
///
/// `closed` teams are visible to every organization member, `secret` teams
/// only to their members and owners. `open` is accepted for compatibility
/// with older organization settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamPrivacy {
    Closed,
    Secret,
    Open,
}

impl TeamPrivacy {
    /// Accepted string forms.
    pub const VARIANTS: &'static [&'static str] = &["closed", "secret", "open"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Secret => "secret",
            Self::Open => "open",
        }
    }
}

impl FromStr for TeamPrivacy {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "closed" => Ok(Self::Closed),
            "secret" => Ok(Self::Secret),
            "open" => Ok(Self::Open),
            other => Err(UnknownVariant {
                value: other.to_string(),
                allowed: Self::VARIANTS,
            }),
        }
    }
}

impl fmt::Display for TeamPrivacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a user inside a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Member,
    Maintainer,
}

impl MemberRole {
    /// Accepted string forms.
    pub const VARIANTS: &'static [&'static str] = &["member", "maintainer"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Maintainer => "maintainer",
        }
    }
}

impl FromStr for MemberRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "maintainer" => Ok(Self::Maintainer),
            other => Err(UnknownVariant {
                value: other.to_string(),
                allowed: Self::VARIANTS,
            }),
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
