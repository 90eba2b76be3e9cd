//! Message routes: inbox listing, sending, read receipts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::assignments::fmt_ts;
use crate::routes::auth::AuthUser;
use crate::services::message::{self, MessageError, MessageRow};
use crate::state::AppState;

#[derive(Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub recipient_id: Uuid,
    pub body: String,
    pub sent_at: String,
    pub read_at: Option<String>,
}

fn to_response(row: MessageRow) -> MessageResponse {
    MessageResponse {
        id: row.id,
        sender_id: row.sender_id,
        sender_name: row.sender_name,
        recipient_id: row.recipient_id,
        body: row.body,
        sent_at: fmt_ts(row.sent_at),
        read_at: row.read_at.map(fmt_ts),
    }
}

fn message_error_to_status(err: MessageError) -> StatusCode {
    match err {
        MessageError::NotFound(_) => StatusCode::NOT_FOUND,
        MessageError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `GET /api/messages`: the caller's inbox and sent mail, newest first.
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<MessageResponse>>, StatusCode> {
    let rows = message::list_for_user(&state.pool, auth.user.id)
        .await
        .map_err(message_error_to_status)?;
    Ok(Json(rows.into_iter().map(to_response).collect()))
}

#[derive(Deserialize)]
pub struct SendMessageBody {
    pub recipient_email: String,
    pub body: String,
}

/// `POST /api/messages`: send a direct message by recipient email.
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<SendMessageBody>,
) -> Result<(StatusCode, Json<MessageResponse>), StatusCode> {
    let text = body.body.trim();
    if text.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let recipient_id =
        crate::services::auth::resolve_user_id_by_email(&state.pool, &body.recipient_email)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::NOT_FOUND)?;

    let row = message::send(&state.pool, auth.user.id, recipient_id, text)
        .await
        .map_err(message_error_to_status)?;
    Ok((StatusCode::CREATED, Json(to_response(row))))
}

/// `PATCH /api/messages/{id}/read`: recipient-only read receipt.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(message_id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    message::mark_read(&state.pool, message_id, auth.user.id)
        .await
        .map_err(message_error_to_status)?;
    Ok(StatusCode::NO_CONTENT)
}
