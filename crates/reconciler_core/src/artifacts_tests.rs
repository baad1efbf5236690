//! Tests for the file-backed artifact writer.

use super::*;
use config_manager::{MemberRole, RepositoryVisibility, TeamPrivacy};
use tempfile::TempDir;

fn writer(dir: &TempDir) -> TerraformArtifactWriter {
    TerraformArtifactWriter::load(None, dir.path().join("terraform")).expect("built-in templates")
}

#[test]
fn generates_repository_artifact_in_created_directory() {
    let dir = TempDir::new().expect("temp dir");
    let writer = writer(&dir);

    let path = writer
        .generate_repository(
            &Repository::new("repo1", RepositoryVisibility::Private).with_description("First"),
        )
        .expect("artifact written");

    assert_eq!(path, dir.path().join("terraform").join("repo1_repository.tf"));
    let content = fs::read_to_string(&path).expect("readable artifact");
    assert!(content.contains(r#"resource "github_repository" "repo1""#));
    assert!(content.contains(r#"visibility  = "private""#));
    assert!(content.contains(r#"description = "First""#));
}

#[test]
fn generates_team_artifact_with_memberships() {
    let dir = TempDir::new().expect("temp dir");
    let writer = writer(&dir);
    let team = Team::new("platform", TeamPrivacy::Closed)
        .with_member("alice@example.com", MemberRole::Maintainer);

    let path = writer.generate_team(&team).expect("artifact written");

    assert!(path.ends_with("platform_team.tf"));
    let content = fs::read_to_string(&path).expect("readable artifact");
    assert!(content.contains(r#"resource "github_team" "platform""#));
    assert!(content.contains(r#"resource "github_team_membership" "platform_alice""#));
    assert!(content.contains(r#"role     = "maintainer""#));
}

#[test]
fn regeneration_is_idempotent() {
    let dir = TempDir::new().expect("temp dir");
    let writer = writer(&dir);
    let repository = Repository::new("repo1", RepositoryVisibility::Public);

    let path = writer.generate_repository(&repository).expect("first write");
    let first = fs::read_to_string(&path).expect("readable artifact");
    writer.generate_repository(&repository).expect("second write");
    let second = fs::read_to_string(&path).expect("readable artifact");

    assert_eq!(first, second);
}

#[test]
fn remove_reports_removed_then_not_found() {
    let dir = TempDir::new().expect("temp dir");
    let writer = writer(&dir);
    let path = writer
        .generate_team(&Team::new("t1", TeamPrivacy::Secret))
        .expect("artifact written");

    let first = writer.remove(ResourceKind::Team, "t1").expect("removal succeeds");
    let second = writer.remove(ResourceKind::Team, "t1").expect("removal succeeds");

    assert_eq!(first, Removal::Removed(path.clone()));
    assert_eq!(second, Removal::NotFound(path.clone()));
    assert!(!path.exists());
}

#[test]
fn remove_leaves_the_other_kind_alone() {
    let dir = TempDir::new().expect("temp dir");
    let writer = writer(&dir);
    let repo_path = writer
        .generate_repository(&Repository::new("shared", RepositoryVisibility::Public))
        .expect("artifact written");

    let removal = writer
        .remove(ResourceKind::Team, "shared")
        .expect("removal succeeds");

    assert!(matches!(removal, Removal::NotFound(_)));
    assert!(repo_path.exists());
}

#[test]
fn unaddressable_identity_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let writer = writer(&dir);

    let result = writer.remove(ResourceKind::Repository, "../outside");

    assert!(matches!(result, Err(ArtifactError::InvalidName { .. })));
}
