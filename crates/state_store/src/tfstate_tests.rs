//! Tests for Terraform state extraction.

use super::*;
use reconciler_core::{ChangeSet, MemberRole, Team, TeamPrivacy};
use serde_json::json;
use tempfile::TempDir;

fn sample_state() -> Value {
    json!({
        "version": 4,
        "terraform_version": "1.9.5",
        "resources": [
            {
                "mode": "managed",
                "type": "github_repository",
                "name": "example-repo",
                "instances": [{
                    "attributes": {
                        "name": "example-repo",
                        "description": "Example description",
                        "visibility": "public",
                        "gitignore_template": "Rust",
                        "node_id": "R_kgDOabc"
                    }
                }]
            },
            {
                "mode": "managed",
                "type": "github_team",
                "name": "example-team",
                "instances": [{
                    "attributes": {
                        "id": "4567",
                        "slug": "example-team",
                        "name": "example-team",
                        "description": null,
                        "privacy": "closed"
                    }
                }]
            },
            {
                "mode": "managed",
                "type": "github_team_membership",
                "name": "example-team_alice",
                "instances": [{
                    "attributes": {
                        "team_id": "4567",
                        "username": "alice",
                        "role": "maintainer"
                    }
                }]
            },
            {
                "mode": "data",
                "type": "github_repository",
                "name": "lookup",
                "instances": [{"attributes": {"name": "someone-elses-repo"}}]
            },
            {
                "mode": "managed",
                "type": "github_branch_protection",
                "name": "main",
                "instances": [{"attributes": {"pattern": "main"}}]
            }
        ]
    })
}

#[test]
fn extracts_repositories_and_teams() {
    let state = extract_resources(&sample_state()).expect("valid state");

    assert_eq!(
        serde_json::to_value(&state).expect("serializable"),
        json!({
            "repositories": [{
                "repository_name": "example-repo",
                "description": "Example description",
                "visibility": "public",
                "gitignore_template": "Rust"
            }],
            "teams": [{
                "team_name": "example-team",
                "description": "",
                "privacy": "closed",
                "members": [{"username": "alice", "role": "maintainer"}]
            }]
        })
    );
}

#[test]
fn memberships_match_teams_by_slug() {
    let tfstate = json!({
        "resources": [
            {
                "type": "github_team_membership",
                "instances": [{"attributes": {"team_id": "devs", "username": "bob"}}]
            },
            {
                "type": "github_team",
                "instances": [{"attributes": {"id": "1", "slug": "devs", "name": "devs", "privacy": "secret"}}]
            },
            {
                "type": "github_team_membership",
                "instances": [{"attributes": {"team_id": "999", "username": "mallory", "role": "member"}}]
            }
        ]
    });

    let state = extract_resources(&tfstate).expect("valid state");

    assert_eq!(state.teams.len(), 1);
    assert_eq!(
        state.teams[0].get("members"),
        Some(&json!([{"username": "bob", "role": "member"}]))
    );
}

#[test]
fn state_without_resources_is_empty() {
    let state = extract_resources(&json!({"version": 4})).expect("valid state");

    assert!(state.is_empty());
}

#[test]
fn missing_name_is_a_missing_key_error() {
    let tfstate = json!({
        "resources": [{
            "type": "github_repository",
            "instances": [{"attributes": {"visibility": "private"}}]
        }]
    });

    let result = extract_resources(&tfstate);

    match result {
        Err(StateError::MissingKey { key, resource_type }) => {
            assert_eq!(key, "name");
            assert_eq!(resource_type, "github_repository");
        }
        other => panic!("Expected MissingKey, got {other:?}"),
    }
}

#[test]
fn resource_without_type_is_malformed() {
    let tfstate = json!({"resources": [{"instances": []}]});

    let result = extract_resources(&tfstate);

    assert!(matches!(result, Err(StateError::Malformed { .. })));
}

#[test]
fn load_tfstate_reports_missing_file() {
    let dir = TempDir::new().expect("temp dir");

    let result = load_tfstate(&dir.path().join("terraform.tfstate"));

    assert!(matches!(result, Err(StateError::NotFound { .. })));
}

#[test]
fn load_tfstate_reports_invalid_json() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("terraform.tfstate");
    fs::write(&path, "{ not json").expect("write fixture");

    let result = load_tfstate(&path);

    assert!(matches!(result, Err(StateError::Parse { .. })));
}

#[test]
fn load_then_extract_from_disk() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("terraform.tfstate");
    fs::write(&path, sample_state().to_string()).expect("write fixture");

    let state = extract_resources(&load_tfstate(&path).expect("readable")).expect("valid state");

    assert_eq!(state.repositories.len(), 1);
    assert_eq!(state.teams.len(), 1);
}

#[test]
fn applied_team_is_not_updated_again() {
    // Terraform records memberships in its own order, unrelated to the
    // order the desired team lists them in.
    let tfstate = json!({
        "resources": [
            {
                "type": "github_team",
                "instances": [{"attributes": {"id": "42", "slug": "t1", "name": "t1", "privacy": "closed"}}]
            },
            {
                "type": "github_team_membership",
                "instances": [{"attributes": {"team_id": "42", "username": "alice", "role": "member"}}]
            },
            {
                "type": "github_team_membership",
                "instances": [{"attributes": {"team_id": "42", "username": "bob", "role": "maintainer"}}]
            }
        ]
    });
    let desired = vec![Team::new("t1", TeamPrivacy::Closed)
        .with_member("bob", MemberRole::Maintainer)
        .with_member("alice", MemberRole::Member)];

    let state = extract_resources(&tfstate).expect("valid state");
    let changes = ChangeSet::compute(&state, &[], &desired).expect("diff succeeds");

    assert!(changes.is_empty(), "no changes expected, got {changes:?}");
}
