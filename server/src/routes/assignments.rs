//! Assignment routes: definitions, submissions, and marking.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::routes::units::unit_error_to_status;
use crate::services::assignment::{self, AssignmentError, AssignmentRow, SubmissionRow};
use crate::services::mark;
use crate::services::session::Role;
use crate::services::unit;
use crate::state::AppState;

#[derive(Serialize)]
pub struct AssignmentResponse {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub unit_code: Option<String>,
    pub title: String,
    pub instructions: Option<String>,
    pub due_at: Option<String>,
}

#[derive(Serialize)]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub user_id: Uuid,
    pub body: Option<String>,
    pub upload_id: Option<Uuid>,
    pub submitted_at: String,
    pub mark: Option<f64>,
    pub feedback: Option<String>,
}

pub(crate) fn fmt_ts(ts: time::OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_default()
}

pub(crate) fn to_assignment_response(row: AssignmentRow) -> AssignmentResponse {
    AssignmentResponse {
        id: row.id,
        unit_id: row.unit_id,
        unit_code: row.unit_code,
        title: row.title,
        instructions: row.instructions,
        due_at: row.due_at.map(fmt_ts),
    }
}

fn to_submission_response(row: SubmissionRow) -> SubmissionResponse {
    SubmissionResponse {
        id: row.id,
        assignment_id: row.assignment_id,
        user_id: row.user_id,
        body: row.body,
        upload_id: row.upload_id,
        submitted_at: fmt_ts(row.submitted_at),
        mark: row.mark,
        feedback: row.feedback,
    }
}

pub(crate) fn assignment_error_to_status(err: AssignmentError) -> StatusCode {
    match err {
        AssignmentError::NotFound(_) | AssignmentError::SubmissionNotFound(_) => StatusCode::NOT_FOUND,
        AssignmentError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct CreateAssignmentBody {
    pub title: String,
    pub instructions: Option<String>,
    /// RFC 3339 timestamp, e.g. `"2026-04-01T23:59:00Z"`.
    pub due_at: Option<String>,
}

/// `POST /api/units/{id}/assignments`: create an assignment (unit staff).
pub async fn create_assignment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(unit_id): Path<Uuid>,
    Json(body): Json<CreateAssignmentBody>,
) -> Result<(StatusCode, Json<AssignmentResponse>), StatusCode> {
    unit::ensure_unit_staff(&state.pool, unit_id, &auth.user)
        .await
        .map_err(unit_error_to_status)?;

    let title = body.title.trim();
    if title.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let due_at = match body.due_at.as_deref() {
        Some(raw) => Some(
            time::OffsetDateTime::parse(raw, &Rfc3339).map_err(|_| StatusCode::BAD_REQUEST)?,
        ),
        None => None,
    };

    let row = assignment::create_assignment(
        &state.pool,
        unit_id,
        title,
        body.instructions.as_deref(),
        due_at,
    )
    .await
    .map_err(assignment_error_to_status)?;

    Ok((StatusCode::CREATED, Json(to_assignment_response(row))))
}

/// `GET /api/assignments`: assignments across every visible unit.
pub async fn list_assignments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<AssignmentResponse>>, StatusCode> {
    let rows = assignment::list_for_user(&state.pool, &auth.user)
        .await
        .map_err(assignment_error_to_status)?;
    Ok(Json(rows.into_iter().map(to_assignment_response).collect()))
}

#[derive(Deserialize)]
pub struct SubmitBody {
    pub body: Option<String>,
    pub upload_id: Option<Uuid>,
}

/// `POST /api/assignments/{id}/submissions`: hand in work (students).
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(assignment_id): Path<Uuid>,
    Json(body): Json<SubmitBody>,
) -> Result<(StatusCode, Json<SubmissionResponse>), StatusCode> {
    if auth.user.role != Role::Student {
        return Err(StatusCode::FORBIDDEN);
    }
    if body.body.as_deref().unwrap_or("").trim().is_empty() && body.upload_id.is_none() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let row = assignment::get_assignment(&state.pool, assignment_id)
        .await
        .map_err(assignment_error_to_status)?;
    unit::ensure_unit_access(&state.pool, row.unit_id, &auth.user)
        .await
        .map_err(unit_error_to_status)?;

    let submission = assignment::submit(
        &state.pool,
        assignment_id,
        auth.user.id,
        body.body.as_deref(),
        body.upload_id,
    )
    .await
    .map_err(assignment_error_to_status)?;

    Ok((StatusCode::CREATED, Json(to_submission_response(submission))))
}

/// `GET /api/assignments/{id}/submissions/mine`: the caller's submission.
pub async fn my_submission(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(assignment_id): Path<Uuid>,
) -> Result<Json<SubmissionResponse>, StatusCode> {
    let submission = assignment::my_submission(&state.pool, assignment_id, auth.user.id)
        .await
        .map_err(assignment_error_to_status)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(to_submission_response(submission)))
}

/// `GET /api/assignments/{id}/submissions`: all submissions (unit staff).
pub async fn list_submissions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(assignment_id): Path<Uuid>,
) -> Result<Json<Vec<SubmissionResponse>>, StatusCode> {
    let row = assignment::get_assignment(&state.pool, assignment_id)
        .await
        .map_err(assignment_error_to_status)?;
    unit::ensure_unit_staff(&state.pool, row.unit_id, &auth.user)
        .await
        .map_err(unit_error_to_status)?;

    let submissions = assignment::list_submissions(&state.pool, assignment_id)
        .await
        .map_err(assignment_error_to_status)?;
    Ok(Json(submissions.into_iter().map(to_submission_response).collect()))
}

#[derive(Deserialize)]
pub struct MarkBody {
    pub mark: f64,
    pub max_mark: f64,
    pub feedback: Option<String>,
}

/// `PATCH /api/submissions/{id}/mark`: record a mark and release it to the
/// student's marks page under `Assignment: <title>`.
pub async fn mark_submission(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(submission_id): Path<Uuid>,
    Json(body): Json<MarkBody>,
) -> Result<Json<SubmissionResponse>, StatusCode> {
    if body.mark < 0.0 || body.max_mark <= 0.0 || body.mark > body.max_mark {
        return Err(StatusCode::BAD_REQUEST);
    }

    let submission = assignment::get_submission(&state.pool, submission_id)
        .await
        .map_err(assignment_error_to_status)?;
    let row = assignment::get_assignment(&state.pool, submission.assignment_id)
        .await
        .map_err(assignment_error_to_status)?;
    unit::ensure_unit_staff(&state.pool, row.unit_id, &auth.user)
        .await
        .map_err(unit_error_to_status)?;

    let updated = assignment::mark_submission(
        &state.pool,
        submission_id,
        body.mark,
        body.feedback.as_deref(),
    )
    .await
    .map_err(assignment_error_to_status)?;

    let component = format!("Assignment: {}", row.title);
    mark::upsert_mark(
        &state.pool,
        row.unit_id,
        submission.user_id,
        &component,
        body.mark,
        body.max_mark,
        Some(auth.user.id),
    )
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(to_submission_response(updated)))
}

#[cfg(test)]
#[path = "assignments_test.rs"]
mod tests;
