//! Marks routes: the student marks page and manual mark entry.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::routes::units::unit_error_to_status;
use crate::services::mark;
use crate::services::unit;
use crate::state::AppState;

#[derive(Serialize)]
pub struct MarkRowResponse {
    pub unit_code: String,
    pub component: String,
    pub score: f64,
    pub max_score: f64,
}

/// `GET /api/marks`: every released mark for the caller.
pub async fn list_marks(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<MarkRowResponse>>, StatusCode> {
    let rows = mark::list_for_user(&state.pool, auth.user.id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(
        rows.into_iter()
            .map(|row| MarkRowResponse {
                unit_code: row.unit_code,
                component: row.component,
                score: row.score,
                max_score: row.max_score,
            })
            .collect(),
    ))
}

#[derive(Deserialize)]
pub struct UpsertMarkBody {
    pub student_email: String,
    pub component: String,
    pub score: f64,
    pub max_score: f64,
}

/// `POST /api/units/{id}/marks`: manual mark entry (unit staff only), for
/// components with no auto-graded source (participation, exams on paper).
pub async fn upsert_mark(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(unit_id): Path<Uuid>,
    Json(body): Json<UpsertMarkBody>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    unit::ensure_unit_staff(&state.pool, unit_id, &auth.user)
        .await
        .map_err(unit_error_to_status)?;

    let component = body.component.trim();
    if component.is_empty() || body.score < 0.0 || body.max_score <= 0.0 || body.score > body.max_score {
        return Err(StatusCode::BAD_REQUEST);
    }

    let student_id =
        crate::services::auth::resolve_user_id_by_email(&state.pool, &body.student_email)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::NOT_FOUND)?;

    mark::upsert_mark(
        &state.pool,
        unit_id,
        student_id,
        component,
        body.score,
        body.max_score,
        Some(auth.user.id),
    )
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(serde_json::json!({ "ok": true })))
}
