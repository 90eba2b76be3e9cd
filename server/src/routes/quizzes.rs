//! Quiz routes: creation, retrieval, and auto-graded submission.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::routes::units::unit_error_to_status;
use crate::services::mark;
use crate::services::quiz::{self, Question, QuizError};
use crate::services::session::Role;
use crate::services::unit;
use crate::state::AppState;

pub(crate) fn quiz_error_to_status(err: QuizError) -> StatusCode {
    match err {
        QuizError::NotFound(_) => StatusCode::NOT_FOUND,
        QuizError::BadQuestions(_) => StatusCode::UNPROCESSABLE_ENTITY,
        QuizError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Deserialize)]
pub struct CreateQuizBody {
    pub title: String,
    pub questions: Vec<Question>,
    pub duration_mins: Option<i32>,
}

/// `POST /api/units/{id}/quizzes`: create a quiz (unit staff only).
pub async fn create_quiz(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(unit_id): Path<Uuid>,
    Json(body): Json<CreateQuizBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), StatusCode> {
    unit::ensure_unit_staff(&state.pool, unit_id, &auth.user)
        .await
        .map_err(unit_error_to_status)?;

    let title = body.title.trim();
    if title.is_empty() || body.questions.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    // Every answer index must land inside its option list.
    if body
        .questions
        .iter()
        .any(|q| q.answer_index >= q.options.len() || q.options.is_empty())
    {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    let row = quiz::create_quiz(&state.pool, unit_id, title, &body.questions, body.duration_mins)
        .await
        .map_err(quiz_error_to_status)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": row.id, "title": row.title })),
    ))
}

/// A question as shown to students: no answer key.
#[derive(Serialize)]
pub struct QuestionView {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub points: f64,
}

#[derive(Serialize)]
pub struct QuizDetailResponse {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub title: String,
    pub duration_mins: Option<i32>,
    pub questions: Vec<QuestionView>,
}

fn strip_answers(questions: Vec<Question>) -> Vec<QuestionView> {
    questions
        .into_iter()
        .map(|q| QuestionView { id: q.id, prompt: q.prompt, options: q.options, points: q.points })
        .collect()
}

/// `GET /api/quizzes/{id}`: quiz with questions. Students never receive the
/// answer key; staff fetch the raw rows through the same route's staff arm.
pub async fn get_quiz(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let row = quiz::get_quiz(&state.pool, quiz_id)
        .await
        .map_err(quiz_error_to_status)?;
    unit::ensure_unit_access(&state.pool, row.unit_id, &auth.user)
        .await
        .map_err(unit_error_to_status)?;

    if auth.user.role.is_staff() {
        return Ok(Json(serde_json::json!({
            "id": row.id,
            "unit_id": row.unit_id,
            "title": row.title,
            "duration_mins": row.duration_mins,
            "questions": row.questions,
        })));
    }

    let view = QuizDetailResponse {
        id: row.id,
        unit_id: row.unit_id,
        title: row.title,
        duration_mins: row.duration_mins,
        questions: strip_answers(row.questions),
    };
    Ok(Json(serde_json::to_value(view).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?))
}

#[derive(Deserialize)]
pub struct SubmitQuizBody {
    /// Question id -> chosen option index.
    pub answers: HashMap<String, usize>,
}

#[derive(Serialize)]
pub struct QuizResultResponse {
    pub quiz_id: Uuid,
    pub score: f64,
    pub max_score: f64,
}

/// `POST /api/quizzes/{id}/submissions`: student submission, auto-graded.
/// The released mark lands in the marks table under `Quiz: <title>`.
pub async fn submit_quiz(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(quiz_id): Path<Uuid>,
    Json(body): Json<SubmitQuizBody>,
) -> Result<Json<QuizResultResponse>, StatusCode> {
    if auth.user.role != Role::Student {
        return Err(StatusCode::FORBIDDEN);
    }

    let quiz_row = quiz::get_quiz(&state.pool, quiz_id)
        .await
        .map_err(quiz_error_to_status)?;
    unit::ensure_unit_access(&state.pool, quiz_row.unit_id, &auth.user)
        .await
        .map_err(unit_error_to_status)?;

    let (score, max_score) = quiz::submit_quiz(&state.pool, &quiz_row, auth.user.id, &body.answers)
        .await
        .map_err(quiz_error_to_status)?;

    let component = format!("Quiz: {}", quiz_row.title);
    mark::upsert_mark(
        &state.pool,
        quiz_row.unit_id,
        auth.user.id,
        &component,
        score,
        max_score,
        None,
    )
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(QuizResultResponse { quiz_id, score, max_score }))
}

#[cfg(test)]
#[path = "quizzes_test.rs"]
mod tests;
