//! Access-token and refresh-session management.
//!
//! ARCHITECTURE
//! ============
//! Two token classes back the auth flow: short-lived access tokens stored
//! plain (validated on every request) and long-lived refresh tokens stored
//! as SHA-256 hashes. Refresh consumption is destructive (revoke + reissue)
//! so a replayed refresh token fails instead of minting a second session.

use std::fmt::Write;

use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// SHA-256 a token for at-rest storage.
#[must_use]
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

/// Account role, stored as lowercase text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "student" => Some(Self::Student),
            "teacher" => Some(Self::Teacher),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Teachers and admins manage unit content and marking.
    #[must_use]
    pub fn is_staff(self) -> bool {
        matches!(self, Self::Teacher | Self::Admin)
    }
}

/// User row returned from token validation; serialized to clients verbatim.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionUser {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Account role.
    pub role: Role,
}

fn row_to_session_user(row: &sqlx::postgres::PgRow) -> SessionUser {
    let role_raw: String = row.get("role");
    SessionUser {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        role: Role::parse(&role_raw).unwrap_or(Role::Student),
    }
}

/// Create an access token for the given user, returning the token.
pub async fn create_access_token(pool: &PgPool, user_id: Uuid) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query("INSERT INTO access_tokens (token, user_id) VALUES ($1, $2)")
        .bind(&token)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(token)
}

/// Validate an access token and return the associated user.
pub async fn validate_access_token(
    pool: &PgPool,
    token: &str,
) -> Result<Option<SessionUser>, sqlx::Error> {
    let row = sqlx::query(
        r"SELECT u.id, u.name, u.email, u.role
          FROM access_tokens t
          JOIN users u ON u.id = t.user_id
          WHERE t.token = $1 AND t.expires_at > now()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(row_to_session_user))
}

/// Delete an access token (logout).
pub async fn delete_access_token(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM access_tokens WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Create a refresh session for the given user, returning the raw token.
/// Only the hash is stored.
pub async fn create_refresh_session(pool: &PgPool, user_id: Uuid) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query("INSERT INTO refresh_sessions (token_hash, user_id) VALUES ($1, $2)")
        .bind(hash_token(&token))
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(token)
}

/// Consume a refresh token atomically, returning the `user_id` if it was
/// live. The session is revoked in the same statement, so the caller must
/// mint a replacement (rotation).
pub async fn consume_refresh_session(
    pool: &PgPool,
    raw_token: &str,
) -> Result<Option<Uuid>, sqlx::Error> {
    let row = sqlx::query(
        r"UPDATE refresh_sessions
          SET revoked_at = now()
          WHERE token_hash = $1 AND revoked_at IS NULL AND expires_at > now()
          RETURNING user_id",
    )
    .bind(hash_token(raw_token))
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.get("user_id")))
}

/// Revoke a refresh session without reissuing (logout).
pub async fn revoke_refresh_session(pool: &PgPool, raw_token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE refresh_sessions SET revoked_at = now() WHERE token_hash = $1")
        .bind(hash_token(raw_token))
        .execute(pool)
        .await?;
    Ok(())
}

/// Fetch a user by id in `SessionUser` shape (refresh responses).
pub async fn fetch_session_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<SessionUser>, sqlx::Error> {
    let row = sqlx::query("SELECT id, name, email, role FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(row_to_session_user))
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
