//! User administration routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::routes::auth::{AuthUser, require_admin, require_staff};
use crate::services::auth as auth_svc;
use crate::services::session::{Role, SessionUser};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize)]
pub struct CreateUserBody {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub password: String,
}

/// `POST /api/users`: create an account (admin only).
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateUserBody>,
) -> Result<(StatusCode, Json<SessionUser>), StatusCode> {
    require_admin(&auth.user)?;

    let name = body.name.trim();
    if name.is_empty() || body.password.len() < MIN_PASSWORD_LEN {
        return Err(StatusCode::BAD_REQUEST);
    }

    let user = auth_svc::create_user(&state.pool, &body.email, name, body.role, &body.password)
        .await
        .map_err(|e| match e {
            auth_svc::AuthError::InvalidEmail => StatusCode::BAD_REQUEST,
            auth_svc::AuthError::EmailTaken => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        })?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /api/users`: directory listing (staff only).
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SessionUser>>, StatusCode> {
    require_staff(&auth.user)?;
    let users = auth_svc::list_users(&state.pool)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(users))
}
