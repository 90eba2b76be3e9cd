use super::*;

use axum::http::StatusCode;
use uuid::Uuid;

use crate::services::assignment::{AssignmentError, AssignmentRow};

// =============================================================================
// fmt_ts
// =============================================================================

#[test]
fn fmt_ts_renders_rfc3339() {
    let ts = time::OffsetDateTime::from_unix_timestamp(1_767_225_600).unwrap();
    assert_eq!(fmt_ts(ts), "2026-01-01T00:00:00Z");
}

// =============================================================================
// to_assignment_response
// =============================================================================

#[test]
fn assignment_response_carries_due_date_as_string() {
    let row = AssignmentRow {
        id: Uuid::nil(),
        unit_id: Uuid::nil(),
        unit_code: Some("COMP1010".into()),
        title: "Essay".into(),
        instructions: None,
        due_at: Some(time::OffsetDateTime::from_unix_timestamp(1_767_225_600).unwrap()),
    };
    let resp = to_assignment_response(row);
    assert_eq!(resp.due_at.as_deref(), Some("2026-01-01T00:00:00Z"));
    assert_eq!(resp.unit_code.as_deref(), Some("COMP1010"));
}

#[test]
fn assignment_response_without_due_date() {
    let row = AssignmentRow {
        id: Uuid::nil(),
        unit_id: Uuid::nil(),
        unit_code: None,
        title: "Essay".into(),
        instructions: None,
        due_at: None,
    };
    assert!(to_assignment_response(row).due_at.is_none());
}

// =============================================================================
// error mapping
// =============================================================================

#[test]
fn assignment_errors_map_to_expected_statuses() {
    assert_eq!(
        assignment_error_to_status(AssignmentError::NotFound(Uuid::nil())),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        assignment_error_to_status(AssignmentError::SubmissionNotFound(Uuid::nil())),
        StatusCode::NOT_FOUND
    );
}
