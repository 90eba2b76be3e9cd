//! Upload service: multipart file persistence and retrieval.
//!
//! Files land on local disk under `UPLOAD_DIR` with a UUID prefix so two
//! uploads of `essay.pdf` never collide; the original name survives only in
//! the metadata row.

use std::path::PathBuf;

use sqlx::{PgPool, Row};
use uuid::Uuid;

const DEFAULT_UPLOAD_DIR: &str = "uploads";
const MAX_NAME_LEN: usize = 80;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload not found: {0}")]
    NotFound(Uuid),
    #[error("empty upload")]
    Empty,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct UploadRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    #[serde(skip)]
    pub stored_path: String,
}

pub(crate) fn upload_dir() -> PathBuf {
    std::env::var("UPLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR))
}

/// Reduce an arbitrary client file name to a safe, bounded base name:
/// path separators and control characters are stripped, anything else
/// non-portable becomes `_`, and empty results fall back to `"file"`.
#[must_use]
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(raw);

    let mut name: String = base
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    // No hidden files and no extension-only names.
    while name.starts_with('.') {
        name.remove(0);
    }
    if name.len() > MAX_NAME_LEN {
        name.truncate(MAX_NAME_LEN);
    }
    if name.is_empty() {
        name = "file".to_owned();
    }
    name
}

/// Persist file bytes and a metadata row; returns the metadata.
pub async fn store(
    pool: &PgPool,
    owner_id: Uuid,
    raw_file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<UploadRow, UploadError> {
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }

    let id = Uuid::new_v4();
    let file_name = sanitize_file_name(raw_file_name);
    let dir = upload_dir();
    tokio::fs::create_dir_all(&dir).await?;
    let stored_path = dir.join(format!("{id}_{file_name}"));
    tokio::fs::write(&stored_path, bytes).await?;

    let size_bytes = i64::try_from(bytes.len()).unwrap_or(i64::MAX);
    sqlx::query(
        r"INSERT INTO uploads (id, owner_id, file_name, content_type, size_bytes, stored_path)
          VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(id)
    .bind(owner_id)
    .bind(&file_name)
    .bind(content_type)
    .bind(size_bytes)
    .bind(stored_path.to_string_lossy().as_ref())
    .execute(pool)
    .await?;

    Ok(UploadRow {
        id,
        owner_id,
        file_name,
        content_type: content_type.to_owned(),
        size_bytes,
        stored_path: stored_path.to_string_lossy().into_owned(),
    })
}

/// Fetch upload metadata.
pub async fn get_meta(pool: &PgPool, upload_id: Uuid) -> Result<UploadRow, UploadError> {
    let row = sqlx::query(
        "SELECT id, owner_id, file_name, content_type, size_bytes, stored_path FROM uploads WHERE id = $1",
    )
    .bind(upload_id)
    .fetch_optional(pool)
    .await?
    .ok_or(UploadError::NotFound(upload_id))?;

    Ok(UploadRow {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        file_name: row.get("file_name"),
        content_type: row.get("content_type"),
        size_bytes: row.get("size_bytes"),
        stored_path: row.get("stored_path"),
    })
}

/// Read an upload's bytes from disk.
pub async fn read_bytes(meta: &UploadRow) -> Result<Vec<u8>, UploadError> {
    Ok(tokio::fs::read(&meta.stored_path).await?)
}

#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;
