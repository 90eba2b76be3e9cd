use super::*;

// =============================================================================
// Role
// =============================================================================

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"student\"");
    assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"teacher\"");
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
}

#[test]
fn role_deserializes_lowercase() {
    let role: Role = serde_json::from_str("\"teacher\"").unwrap();
    assert_eq!(role, Role::Teacher);
}

#[test]
fn role_rejects_unknown_value() {
    assert!(serde_json::from_str::<Role>("\"janitor\"").is_err());
}

#[test]
fn role_staff_split() {
    assert!(!Role::Student.is_staff());
    assert!(Role::Teacher.is_staff());
    assert!(Role::Admin.is_staff());
}

// =============================================================================
// RefreshResponse: the optional user field drives store behavior (see
// state::auth), so the wire default matters.
// =============================================================================

#[test]
fn refresh_response_user_defaults_to_none() {
    let resp: RefreshResponse = serde_json::from_str(r#"{"token":"T2"}"#).unwrap();
    assert!(resp.user.is_none());
    assert_eq!(resp.token, "T2");
}

#[test]
fn refresh_response_carries_user_when_present() {
    let resp: RefreshResponse = serde_json::from_str(
        r#"{"token":"T2","user":{"id":"u1","name":"Ada","email":"ada@example.com","role":"student"}}"#,
    )
    .unwrap();
    assert_eq!(resp.user.unwrap().name, "Ada");
}

// =============================================================================
// MarkRow::percent
// =============================================================================

#[test]
fn mark_percent_simple() {
    let row = MarkRow {
        unit_code: "COMP1010".into(),
        component: "Quiz 1".into(),
        score: 7.5,
        max_score: 10.0,
    };
    assert!((row.percent().unwrap() - 75.0).abs() < f64::EPSILON);
}

#[test]
fn mark_percent_zero_max_is_none() {
    let row = MarkRow {
        unit_code: "COMP1010".into(),
        component: "Attendance".into(),
        score: 0.0,
        max_score: 0.0,
    };
    assert!(row.percent().is_none());
}

// =============================================================================
// Optional wire fields
// =============================================================================

#[test]
fn unit_optional_fields_default() {
    let unit: Unit =
        serde_json::from_str(r#"{"id":"x","code":"COMP1010","title":"Intro"}"#).unwrap();
    assert!(unit.description.is_none());
    assert!(unit.teacher_name.is_none());
}

#[test]
fn submission_unmarked_by_default() {
    let sub: AssignmentSubmission = serde_json::from_str(
        r#"{"id":"s1","assignment_id":"a1","submitted_at":"2026-03-01T10:00:00Z"}"#,
    )
    .unwrap();
    assert!(sub.mark.is_none());
    assert!(sub.feedback.is_none());
    assert!(sub.upload_id.is_none());
}
