//! Tests for snapshot persistence.

use super::*;
use reconciler_core::{MemberRole, Repository, RepositoryVisibility, Team, TeamPrivacy};
use tempfile::TempDir;

fn sample_state() -> ExistingState {
    ExistingState::from_desired(
        &[Repository::new("repo1", RepositoryVisibility::Internal).with_gitignore_template("Rust")],
        &[Team::new("t1", TeamPrivacy::Closed).with_member("alice", MemberRole::Member)],
    )
}

#[test]
fn save_creates_missing_directories() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("terraform").join("nested").join("existing_state.json");

    save_snapshot(&sample_state(), &path).expect("snapshot written");

    assert!(path.is_file());
}

#[test]
fn saved_snapshot_loads_back_unchanged() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("existing_state.json");
    let state = sample_state();

    save_snapshot(&state, &path).expect("snapshot written");
    let loaded = load_snapshot(&path).expect("snapshot readable");

    assert_eq!(loaded, state);
}

#[test]
fn save_overwrites_previous_snapshot_without_leftovers() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("existing_state.json");

    save_snapshot(&sample_state(), &path).expect("first write");
    save_snapshot(&ExistingState::default(), &path).expect("second write");

    assert_eq!(
        load_snapshot(&path).expect("snapshot readable"),
        ExistingState::default()
    );
    let entries = fs::read_dir(dir.path()).expect("listable").count();
    assert_eq!(entries, 1);
}

#[test]
fn snapshot_is_pretty_printed() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("existing_state.json");

    save_snapshot(&sample_state(), &path).expect("snapshot written");

    let content = fs::read_to_string(&path).expect("readable");
    assert!(content.starts_with("{\n  \"repositories\": ["));
}

#[test]
fn missing_snapshot_is_not_found() {
    let dir = TempDir::new().expect("temp dir");

    let result = load_snapshot(&dir.path().join("existing_state.json"));

    assert!(matches!(result, Err(StateError::NotFound { .. })));
}

#[test]
fn snapshot_of_wrong_shape_is_malformed() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("existing_state.json");
    fs::write(&path, r#"{"repositories": "repo1"}"#).expect("write fixture");

    let result = load_snapshot(&path);

    assert!(matches!(result, Err(StateError::Malformed { .. })));
}

#[test]
fn save_into_a_file_path_parent_fails() {
    let dir = TempDir::new().expect("temp dir");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").expect("write fixture");

    let result = save_snapshot(&sample_state(), &blocker.join("existing_state.json"));

    assert!(matches!(result, Err(StateError::Write { .. })));
}
