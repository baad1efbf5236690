//! Tests for change set aggregation.

use super::*;
use config_manager::{MemberRole, RepositoryVisibility, TeamPrivacy};
use serde_json::{json, Value};

fn maps(entries: Vec<Value>) -> Vec<crate::AttributeMap> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect()
}

#[test]
fn compute_diffs_both_kinds_with_their_keys() {
    let existing = ExistingState::new(
        maps(vec![
            json!({"repository_name": "repo1", "visibility": "public"}),
            json!({"repository_name": "repo2", "visibility": "private"}),
        ]),
        maps(vec![json!({"team_name": "t1", "privacy": "closed"})]),
    );
    let repositories = vec![
        Repository::new("repo1", RepositoryVisibility::Private),
        Repository::new("repo3", RepositoryVisibility::Public),
    ];
    let teams = vec![
        Team::new("t1", TeamPrivacy::Closed).with_member("alice", MemberRole::Member),
        Team::new("t2", TeamPrivacy::Secret),
    ];

    let change_set = ChangeSet::compute(&existing, &repositories, &teams).expect("valid state");

    assert_eq!(change_set.repos_to_add, vec![repositories[1].clone()]);
    assert_eq!(change_set.repos_to_update, vec![repositories[0].clone()]);
    assert_eq!(change_set.repos_to_delete.len(), 1);
    assert_eq!(change_set.repos_to_delete[0].identity, "repo2");
    assert_eq!(change_set.teams_to_add, vec![teams[1].clone()]);
    assert_eq!(change_set.teams_to_update, vec![teams[0].clone()]);
    assert!(change_set.teams_to_delete.is_empty());
    assert_eq!(change_set.total(), 5);
}

#[test]
fn snapshot_of_desired_state_yields_empty_change_set() {
    let repositories = vec![Repository::new("repo1", RepositoryVisibility::Public)
        .with_gitignore_template("Rust")];
    let teams = vec![Team::new("t1", TeamPrivacy::Open).with_member("bob", MemberRole::Maintainer)];
    let existing = ExistingState::from_desired(&repositories, &teams);

    let change_set = ChangeSet::compute(&existing, &repositories, &teams).expect("valid state");

    assert!(change_set.is_empty());
}

#[test]
fn malformed_existing_teams_fail_the_computation() {
    let existing = ExistingState::new(Vec::new(), maps(vec![json!({"name": "t1"})]));

    let result = ChangeSet::compute(&existing, &[], &[]);

    assert!(matches!(result, Err(DiffError::MissingExistingKey { .. })));
}
