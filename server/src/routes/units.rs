//! Unit routes: listing, creation, detail aggregation, lessons, enrolments.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::auth::{AuthUser, require_staff};
use crate::services::assignment;
use crate::services::quiz;
use crate::services::unit::{self, LessonRow, UnitError, UnitRow};
use crate::state::AppState;

#[derive(Serialize)]
pub struct UnitResponse {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub teacher_name: Option<String>,
}

#[derive(Serialize)]
pub struct LessonResponse {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub position: i32,
}

#[derive(Serialize)]
pub struct QuizSummaryResponse {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub title: String,
    pub question_count: i64,
    pub duration_mins: Option<i32>,
}

#[derive(Serialize)]
pub struct UnitDetailResponse {
    pub unit: UnitResponse,
    pub lessons: Vec<LessonResponse>,
    pub quizzes: Vec<QuizSummaryResponse>,
    pub assignments: Vec<crate::routes::assignments::AssignmentResponse>,
}

fn to_unit_response(row: UnitRow) -> UnitResponse {
    UnitResponse {
        id: row.id,
        code: row.code,
        title: row.title,
        description: row.description,
        teacher_name: row.teacher_name,
    }
}

fn to_lesson_response(row: LessonRow) -> LessonResponse {
    LessonResponse {
        id: row.id,
        unit_id: row.unit_id,
        title: row.title,
        content: row.content,
        position: row.position,
    }
}

pub(crate) fn unit_error_to_status(err: UnitError) -> StatusCode {
    match err {
        UnitError::NotFound(_) => StatusCode::NOT_FOUND,
        UnitError::Forbidden(_) => StatusCode::FORBIDDEN,
        UnitError::CodeTaken => StatusCode::CONFLICT,
        UnitError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/units`: units visible to the caller.
pub async fn list_units(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<UnitResponse>>, StatusCode> {
    let rows = unit::list_units(&state.pool, &auth.user)
        .await
        .map_err(unit_error_to_status)?;
    Ok(Json(rows.into_iter().map(to_unit_response).collect()))
}

#[derive(Deserialize)]
pub struct CreateUnitBody {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
}

/// `POST /api/units`: create a unit owned by the calling teacher/admin.
pub async fn create_unit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateUnitBody>,
) -> Result<(StatusCode, Json<UnitResponse>), StatusCode> {
    require_staff(&auth.user)?;
    let code = body.code.trim().to_ascii_uppercase();
    let title = body.title.trim();
    if code.is_empty() || title.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let row = unit::create_unit(
        &state.pool,
        &code,
        title,
        body.description.as_deref(),
        auth.user.id,
    )
    .await
    .map_err(unit_error_to_status)?;

    let mut resp = to_unit_response(row);
    resp.teacher_name = Some(auth.user.name.clone());
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `GET /api/units/{id}`: one unit with lessons, quizzes, and assignments.
pub async fn unit_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(unit_id): Path<Uuid>,
) -> Result<Json<UnitDetailResponse>, StatusCode> {
    let unit_row = unit::ensure_unit_access(&state.pool, unit_id, &auth.user)
        .await
        .map_err(unit_error_to_status)?;

    let lessons = unit::list_lessons(&state.pool, unit_id)
        .await
        .map_err(unit_error_to_status)?;
    let quizzes = quiz::list_quiz_summaries(&state.pool, unit_id)
        .await
        .map_err(crate::routes::quizzes::quiz_error_to_status)?;
    let assignments = assignment::list_for_unit(&state.pool, unit_id)
        .await
        .map_err(crate::routes::assignments::assignment_error_to_status)?;

    Ok(Json(UnitDetailResponse {
        unit: to_unit_response(unit_row),
        lessons: lessons.into_iter().map(to_lesson_response).collect(),
        quizzes: quizzes
            .into_iter()
            .map(|q| QuizSummaryResponse {
                id: q.id,
                unit_id: q.unit_id,
                title: q.title,
                question_count: q.question_count,
                duration_mins: q.duration_mins,
            })
            .collect(),
        assignments: assignments
            .into_iter()
            .map(crate::routes::assignments::to_assignment_response)
            .collect(),
    }))
}

#[derive(Deserialize)]
pub struct CreateLessonBody {
    pub title: String,
    pub content: Option<String>,
}

/// `POST /api/units/{id}/lessons`: append a lesson (unit staff only).
pub async fn create_lesson(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(unit_id): Path<Uuid>,
    Json(body): Json<CreateLessonBody>,
) -> Result<(StatusCode, Json<LessonResponse>), StatusCode> {
    unit::ensure_unit_staff(&state.pool, unit_id, &auth.user)
        .await
        .map_err(unit_error_to_status)?;

    let title = body.title.trim();
    if title.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let row = unit::create_lesson(&state.pool, unit_id, title, body.content.as_deref())
        .await
        .map_err(unit_error_to_status)?;
    Ok((StatusCode::CREATED, Json(to_lesson_response(row))))
}

#[derive(Deserialize)]
pub struct EnrolBody {
    pub email: String,
}

/// `POST /api/units/{id}/enrolments`: enrol a student by email (unit staff).
pub async fn enrol(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(unit_id): Path<Uuid>,
    Json(body): Json<EnrolBody>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    unit::ensure_unit_staff(&state.pool, unit_id, &auth.user)
        .await
        .map_err(unit_error_to_status)?;

    let user_id = crate::services::auth::resolve_user_id_by_email(&state.pool, &body.email)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    unit::enrol_user(&state.pool, unit_id, user_id)
        .await
        .map_err(unit_error_to_status)?;

    Ok(Json(serde_json::json!({ "ok": true })))
}
