//! Upload routes: multipart file intake and authenticated download.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Json, Response};
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::services::upload::{self, UploadError};
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

fn upload_error_to_status(err: &UploadError) -> StatusCode {
    match err {
        UploadError::NotFound(_) => StatusCode::NOT_FOUND,
        UploadError::Empty => StatusCode::BAD_REQUEST,
        UploadError::Io(_) | UploadError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `POST /api/uploads`: accept the first file field of a multipart body.
pub async fn create_upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<upload::UploadRow>), StatusCode> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if field.file_name().is_none() {
            continue;
        }
        let file_name = field.file_name().unwrap_or("file").to_owned();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(StatusCode::PAYLOAD_TOO_LARGE);
        }

        let row = upload::store(&state.pool, auth.user.id, &file_name, &content_type, &bytes)
            .await
            .map_err(|e| upload_error_to_status(&e))?;
        return Ok((StatusCode::CREATED, Json(row)));
    }

    Err(StatusCode::BAD_REQUEST)
}

/// `GET /api/uploads/{id}`: download; owner or staff only.
pub async fn download(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(upload_id): Path<Uuid>,
) -> Result<Response, StatusCode> {
    let meta = upload::get_meta(&state.pool, upload_id)
        .await
        .map_err(|e| upload_error_to_status(&e))?;

    if meta.owner_id != auth.user.id && !auth.user.role.is_staff() {
        return Err(StatusCode::FORBIDDEN);
    }

    let bytes = upload::read_bytes(&meta)
        .await
        .map_err(|e| upload_error_to_status(&e))?;

    let disposition = format!("attachment; filename=\"{}\"", meta.file_name);
    Ok((
        [
            (CONTENT_TYPE, meta.content_type.clone()),
            (CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
