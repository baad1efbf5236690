//! Tests for team validation and conversion.

use super::*;
use serde_json::json;

fn raw(value: Value) -> AttributeMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[test]
fn parses_a_team_with_members() {
    let team = Team::from_attributes(&raw(json!({
        "team_name": "platform",
        "description": "Platform engineering",
        "privacy": "closed",
        "members": [
            {"username": "alice@example.com", "role": "maintainer"},
            {"username": "bob", "role": "member"}
        ]
    })))
    .expect("valid team");

    assert_eq!(
        team,
        Team::new("platform", TeamPrivacy::Closed)
            .with_description("Platform engineering")
            .with_member("alice@example.com", MemberRole::Maintainer)
            .with_member("bob", MemberRole::Member)
    );
}

#[test]
fn members_default_to_empty() {
    let team = Team::from_attributes(&raw(json!({"team_name": "t1", "privacy": "secret"})))
        .expect("valid team");

    assert!(team.members.is_empty());
    assert_eq!(team.description, "");
}

#[test]
fn invalid_privacy_is_rejected() {
    let result = Team::from_attributes(&raw(json!({"team_name": "t1", "privacy": "invalid"})));

    match result {
        Err(ValidationError::InvalidEnumValue { field, value, .. }) => {
            assert_eq!(field, "privacy");
            assert_eq!(value, "invalid");
        }
        other => panic!("Expected InvalidEnumValue, got {other:?}"),
    }
}

#[test]
fn invalid_member_role_reports_member_index() {
    let result = Team::from_attributes(&raw(json!({
        "team_name": "t1",
        "privacy": "open",
        "members": [
            {"username": "alice", "role": "member"},
            {"username": "bob", "role": "owner"}
        ]
    })));

    match result {
        Err(ValidationError::InvalidMember { index, source }) => {
            assert_eq!(index, 1);
            assert!(matches!(
                *source,
                ValidationError::InvalidEnumValue { ref field, .. } if field == "role"
            ));
        }
        other => panic!("Expected InvalidMember, got {other:?}"),
    }
}

#[test]
fn member_without_username_is_rejected() {
    let result = Team::from_attributes(&raw(json!({
        "team_name": "t1",
        "privacy": "open",
        "members": [{"role": "member"}]
    })));

    assert_eq!(
        result,
        Err(ValidationError::invalid_member(
            0,
            ValidationError::missing_field("username")
        ))
    );
}

#[test]
fn non_object_member_is_rejected() {
    let result = Team::from_attributes(&raw(json!({
        "team_name": "t1",
        "privacy": "open",
        "members": ["alice"]
    })));

    assert_eq!(
        result,
        Err(ValidationError::invalid_member(0, ValidationError::NotAnObject))
    );
}

#[test]
fn members_must_be_a_list() {
    let result = Team::from_attributes(&raw(json!({
        "team_name": "t1",
        "privacy": "open",
        "members": {"username": "alice"}
    })));

    assert_eq!(result, Err(ValidationError::invalid_type("members", "a list")));
}

#[test]
fn to_attributes_sorts_members() {
    let team = Team::new("t1", TeamPrivacy::Secret)
        .with_member("zed", MemberRole::Member)
        .with_member("amy", MemberRole::Maintainer);

    assert_eq!(
        Value::Object(team.to_attributes()),
        json!({
            "team_name": "t1",
            "description": "",
            "privacy": "secret",
            "members": [
                {"username": "amy", "role": "maintainer"},
                {"username": "zed", "role": "member"}
            ]
        })
    );
}

#[test]
fn parsed_members_are_sorted_by_username_then_role() {
    let team = Team::from_attributes(&raw(json!({
        "team_name": "t1",
        "privacy": "closed",
        "members": [
            {"username": "zed", "role": "member"},
            {"username": "amy", "role": "member"},
            {"username": "amy", "role": "maintainer"}
        ]
    })))
    .expect("valid team");

    assert_eq!(
        team.members,
        vec![
            TeamMember::new("amy", MemberRole::Maintainer),
            TeamMember::new("amy", MemberRole::Member),
            TeamMember::new("zed", MemberRole::Member),
        ]
    );
}

#[test]
fn canonical_existing_sorts_members() {
    let existing = raw(json!({
        "team_name": "t1",
        "privacy": "closed",
        "members": [
            {"username": "bob", "role": "maintainer"},
            {"username": "alice", "role": "member"}
        ]
    }));
    let desired = Team::new("t1", TeamPrivacy::Closed)
        .with_member("alice", MemberRole::Member)
        .with_member("bob", MemberRole::Maintainer);

    assert_eq!(Team::canonical_existing(&existing), desired.to_attributes());
}

#[test]
fn attribute_map_round_trip_is_lossless() {
    let input = raw(json!({
        "team_name": "t1",
        "privacy": "closed",
        "members": [{"username": "alice", "role": "member"}]
    }));

    let team = Team::from_attributes(&input).expect("valid team");
    let reparsed = Team::from_attributes(&team.to_attributes()).expect("map form re-parses");

    assert_eq!(reparsed, team);
    assert_eq!(reparsed.to_attributes(), team.to_attributes());
}
