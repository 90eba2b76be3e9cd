//! Credential auth service: password hashing, login verification, account
//! creation.

use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::services::session::{Role, SessionUser, bytes_to_hex};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email already registered")]
    EmailTaken,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }
    Some(normalized)
}

/// Generate a random 16-byte hex salt.
#[must_use]
pub fn generate_salt() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Salted SHA-256 password hash, hex-encoded.
#[must_use]
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

/// Constant-shape comparison of two hex digests.
#[must_use]
pub fn digests_match(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0_u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Verify email + password and return the account.
///
/// # Errors
///
/// `InvalidCredentials` for an unknown email or a wrong password; callers
/// cannot distinguish the two.
pub async fn verify_login(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<SessionUser, AuthError> {
    let normalized = normalize_email(email).ok_or(AuthError::InvalidCredentials)?;

    let row = sqlx::query(
        "SELECT id, name, email, role, password_hash, password_salt FROM users WHERE email = $1",
    )
    .bind(&normalized)
    .fetch_optional(pool)
    .await?
    .ok_or(AuthError::InvalidCredentials)?;

    let stored_hash: String = row.get("password_hash");
    let salt: String = row.get("password_salt");
    if !digests_match(&hash_password(password, &salt), &stored_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    let role_raw: String = row.get("role");
    Ok(SessionUser {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        role: Role::parse(&role_raw).unwrap_or(Role::Student),
    })
}

/// Create an account with the given role.
///
/// # Errors
///
/// `EmailTaken` when the email is already registered.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    name: &str,
    role: Role,
    password: &str,
) -> Result<SessionUser, AuthError> {
    let normalized = normalize_email(email).ok_or(AuthError::InvalidEmail)?;
    let id = Uuid::new_v4();
    let salt = generate_salt();
    let password_hash = hash_password(password, &salt);

    let inserted = sqlx::query(
        r"INSERT INTO users (id, email, name, role, password_hash, password_salt)
          VALUES ($1, $2, $3, $4, $5, $6)
          ON CONFLICT (email) DO NOTHING",
    )
    .bind(id)
    .bind(&normalized)
    .bind(name)
    .bind(role.as_str())
    .bind(&password_hash)
    .bind(&salt)
    .execute(pool)
    .await?;

    if inserted.rows_affected() == 0 {
        return Err(AuthError::EmailTaken);
    }

    Ok(SessionUser { id, name: name.to_owned(), email: normalized, role })
}

/// List accounts, staff directory style.
pub async fn list_users(pool: &PgPool) -> Result<Vec<SessionUser>, AuthError> {
    let rows = sqlx::query("SELECT id, name, email, role FROM users ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let role_raw: String = row.get("role");
            SessionUser {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
                role: Role::parse(&role_raw).unwrap_or(Role::Student),
            }
        })
        .collect())
}

/// Resolve a user id by email, for enrolment and messaging.
pub async fn resolve_user_id_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<Uuid>, AuthError> {
    let Some(normalized) = normalize_email(email) else {
        return Ok(None);
    };
    let row = sqlx::query("SELECT id FROM users WHERE email = $1")
        .bind(&normalized)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.get("id")))
}

/// Seed the first admin from `ADMIN_EMAIL`/`ADMIN_PASSWORD` when the users
/// table is empty. A non-fatal no-op otherwise.
pub async fn seed_admin_from_env(pool: &PgPool) -> Result<(), AuthError> {
    let (Ok(email), Ok(password)) = (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD"))
    else {
        return Ok(());
    };

    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM users")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let user = create_user(pool, &email, "Administrator", Role::Admin, &password).await?;
    tracing::info!(user_id = %user.id, "seeded initial admin account");
    Ok(())
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
