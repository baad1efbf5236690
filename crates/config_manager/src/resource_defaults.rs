//! Default values applied to partially specified desired resources.
//!
//! Defaults are merged into the raw resource maps before validation, so
//! every value the diff engine compares is fully resolved.
//!
//! # TOML Format
//!
//! ```toml
//! [default_repository]
//! visibility = "private"
//! description = ""
//!
//! [default_team]
//! privacy = "closed"
//! role = "member"
//! ```

use serde::{Deserialize, Serialize};

use crate::visibility::{MemberRole, RepositoryVisibility, TeamPrivacy};

/// Defaults for repository entries.
///
/// A `None` field means "no default": the value must then be supplied by
/// the resource itself, or (for optional fields) stays absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryDefaults {
    pub visibility: Option<RepositoryVisibility>,

    pub description: Option<String>,

    pub gitignore_template: Option<String>,
}

/// Defaults for team entries and their members.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamDefaults {
    pub privacy: Option<TeamPrivacy>,

    pub description: Option<String>,

    /// Role assigned to members that do not declare one
    pub role: Option<MemberRole>,
}
