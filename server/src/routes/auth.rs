//! Auth routes: login, refresh-token rotation, logout, current user.
//!
//! ARCHITECTURE
//! ============
//! Credentials travel as cookies. The short-lived `access_token` and the
//! long-lived `refresh_token` are HttpOnly; `session_active` is a readable
//! marker with the refresh token's lifetime so the SPA can tell "a session
//! might exist" without a network call. Refresh tokens rotate on every use.

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use crate::services::{auth as auth_svc, session};
use crate::state::AppState;

pub(crate) const ACCESS_COOKIE: &str = "access_token";
pub(crate) const REFRESH_COOKIE: &str = "refresh_token";
pub(crate) const MARKER_COOKIE: &str = "session_active";

/// Refresh cookie is scoped to the auth endpoints; no other route needs it.
const REFRESH_COOKIE_PATH: &str = "/api/auth";

const ACCESS_TOKEN_MINUTES: i64 = 15;
const REFRESH_TOKEN_DAYS: i64 = 14;

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn cookie_secure() -> bool {
    if let Some(value) = env_bool("COOKIE_SECURE") {
        return value;
    }

    std::env::var("PUBLIC_BASE_URL")
        .map(|url| url.starts_with("https://"))
        .unwrap_or(false)
}

// =============================================================================
// COOKIE BUILDERS
// =============================================================================

fn build_cookie(
    name: &'static str,
    value: String,
    http_only: bool,
    path: &'static str,
    max_age: Duration,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path(path)
        .http_only(http_only)
        .same_site(SameSite::Lax)
        .secure(cookie_secure())
        .max_age(max_age)
        .build()
}

pub(crate) fn session_cookies(access_token: String, refresh_token: String) -> [Cookie<'static>; 3] {
    [
        build_cookie(
            ACCESS_COOKIE,
            access_token,
            true,
            "/",
            Duration::minutes(ACCESS_TOKEN_MINUTES),
        ),
        build_cookie(
            REFRESH_COOKIE,
            refresh_token,
            true,
            REFRESH_COOKIE_PATH,
            Duration::days(REFRESH_TOKEN_DAYS),
        ),
        build_cookie(
            MARKER_COOKIE,
            "1".to_owned(),
            false,
            "/",
            Duration::days(REFRESH_TOKEN_DAYS),
        ),
    ]
}

pub(crate) fn clear_session_cookies() -> [Cookie<'static>; 3] {
    [
        build_cookie(ACCESS_COOKIE, String::new(), true, "/", Duration::ZERO),
        build_cookie(REFRESH_COOKIE, String::new(), true, REFRESH_COOKIE_PATH, Duration::ZERO),
        build_cookie(MARKER_COOKIE, String::new(), false, "/", Duration::ZERO),
    ]
}

fn add_all(mut jar: CookieJar, cookies: [Cookie<'static>; 3]) -> CookieJar {
    for cookie in cookies {
        jar = jar.add(cookie);
    }
    jar
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the access-token cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: session::SessionUser,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(ACCESS_COOKIE).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        let user = session::validate_access_token(&app_state.pool, token)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { user })
    }
}

/// 403 unless the user is a teacher or admin. Authenticated-but-unauthorized
/// is always 403, never 401; the client's refresh path must not trigger.
pub fn require_staff(user: &session::SessionUser) -> Result<(), StatusCode> {
    if user.role.is_staff() {
        Ok(())
    } else {
        Err(StatusCode::FORBIDDEN)
    }
}

/// 403 unless the user is an admin.
pub fn require_admin(user: &session::SessionUser) -> Result<(), StatusCode> {
    if user.role == session::Role::Admin {
        Ok(())
    } else {
        Err(StatusCode::FORBIDDEN)
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct LoginBody {
    email: String,
    password: String,
}

/// `POST /api/auth/login`: verify credentials, mint both tokens, set
/// cookies. The access token is echoed in the body for display/debug; the
/// cookie copy is what authenticates requests.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginBody>,
) -> Response {
    let limiter_key = body.email.trim().to_ascii_lowercase();
    if state.login_limiter.check_and_record(&limiter_key).is_err() {
        return StatusCode::TOO_MANY_REQUESTS.into_response();
    }

    let user = match auth_svc::verify_login(&state.pool, &body.email, &body.password).await {
        Ok(user) => user,
        Err(auth_svc::AuthError::InvalidCredentials | auth_svc::AuthError::InvalidEmail) => {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "login failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let (access_token, refresh_token) = match mint_tokens(&state, user.id).await {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::error!(error = %e, "token mint failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let jar = add_all(jar, session_cookies(access_token.clone(), refresh_token));
    (
        jar,
        Json(serde_json::json!({ "user": user, "token": access_token })),
    )
        .into_response()
}

/// `POST /api/auth/refresh-token`: rotate the refresh session and mint a
/// fresh access token. Any failure clears the session cookies so the client
/// marker cannot outlive the session.
pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> Response {
    let raw_refresh = jar.get(REFRESH_COOKIE).map(Cookie::value).unwrap_or_default();
    if raw_refresh.is_empty() {
        let jar = add_all(jar, clear_session_cookies());
        return (jar, StatusCode::UNAUTHORIZED).into_response();
    }

    let user_id = match session::consume_refresh_session(&state.pool, raw_refresh).await {
        Ok(Some(user_id)) => user_id,
        Ok(None) => {
            let jar = add_all(jar, clear_session_cookies());
            return (jar, StatusCode::UNAUTHORIZED).into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "refresh lookup failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let user = match session::fetch_session_user(&state.pool, user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            let jar = add_all(jar, clear_session_cookies());
            return (jar, StatusCode::UNAUTHORIZED).into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "refresh user fetch failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let (access_token, refresh_token) = match mint_tokens(&state, user.id).await {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::error!(error = %e, "token mint failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let jar = add_all(jar, session_cookies(access_token.clone(), refresh_token));
    (
        jar,
        Json(serde_json::json!({ "user": user, "token": access_token })),
    )
        .into_response()
}

/// `POST /api/auth/logout`: best-effort token revocation plus cookie
/// clearing. Deliberately does not require a live access token: a client
/// with an expired session can still log out cleanly.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(access) = jar.get(ACCESS_COOKIE).map(Cookie::value) {
        let _ = session::delete_access_token(&state.pool, access).await;
    }
    if let Some(refresh_token) = jar.get(REFRESH_COOKIE).map(Cookie::value) {
        let _ = session::revoke_refresh_session(&state.pool, refresh_token).await;
    }

    let jar = add_all(jar, clear_session_cookies());
    (jar, StatusCode::NO_CONTENT)
}

/// `GET /api/auth/me`: return current user.
pub async fn me(auth: AuthUser) -> Json<session::SessionUser> {
    Json(auth.user)
}

async fn mint_tokens(state: &AppState, user_id: uuid::Uuid) -> Result<(String, String), sqlx::Error> {
    let access = session::create_access_token(&state.pool, user_id).await?;
    let refresh_token = session::create_refresh_session(&state.pool, user_id).await?;
    Ok((access, refresh_token))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
