//! Typed REST helpers for communicating with the server.
//!
//! Every helper funnels through [`ApiClient::send`], so expired-token
//! recovery, 403 handling, and 5xx propagation behave identically across the
//! whole API surface. Helpers translate "response arrived but not 2xx" into
//! [`ApiError::Status`] so pages deal with one error type.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde_json::json;

use crate::net::http::{ApiClient, ApiError, Request};
use crate::net::types::{
    Assignment, AssignmentSubmission, Lesson, LoginResponse, MarkRow, Message, Unit, UnitDetail,
    User,
};

fn expect_ok<T: serde::de::DeserializeOwned>(
    resp: &crate::net::http::Response,
) -> Result<T, ApiError> {
    if !resp.ok() {
        return Err(ApiError::Status(resp.status));
    }
    resp.json()
}

/// `POST /api/auth/login`. A 401 here is a credential failure, not an
/// expired session, so the request opts out of the refresh-retry path.
///
/// # Errors
///
/// [`ApiError::Status`] with 401 on bad credentials; other [`ApiError`]
/// variants as produced by the pipeline.
pub async fn login(api: &ApiClient, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
    let req = Request::post(
        "/api/auth/login",
        Some(json!({ "email": email, "password": password })),
    )
    .without_auth_retry();
    let resp = api.send(&req).await?;
    expect_ok(&resp)
}

/// `GET /api/auth/me`: the currently authenticated user. Rides the full
/// pipeline, so an expired access token is refreshed transparently; this is
/// also what session bootstrap calls on app load.
///
/// # Errors
///
/// [`ApiError::SessionExpired`] when recovery fails; [`ApiError::Status`]
/// on any other non-2xx.
pub async fn fetch_current_user(api: &ApiClient) -> Result<User, ApiError> {
    let resp = api.send(&Request::get("/api/auth/me")).await?;
    expect_ok(&resp)
}

/// `POST /api/auth/logout`. Local state is cleared by the caller regardless
/// of the outcome, so delivery failures are ignored.
pub async fn logout(api: &ApiClient) {
    let req = Request::post("/api/auth/logout", None).without_auth_retry();
    let _ = api.send(&req).await;
}

/// `GET /api/units`: units visible to the caller.
///
/// # Errors
///
/// See [`ApiError`].
pub async fn fetch_units(api: &ApiClient) -> Result<Vec<Unit>, ApiError> {
    let resp = api.send(&Request::get("/api/units")).await?;
    expect_ok(&resp)
}

/// `GET /api/units/{id}`: one unit with lessons, quizzes, and assignments.
///
/// # Errors
///
/// See [`ApiError`].
pub async fn fetch_unit_detail(api: &ApiClient, unit_id: &str) -> Result<UnitDetail, ApiError> {
    let resp = api
        .send(&Request::get(format!("/api/units/{unit_id}")))
        .await?;
    expect_ok(&resp)
}

/// `POST /api/units`: create a unit (staff only; non-staff get 403).
///
/// # Errors
///
/// See [`ApiError`].
pub async fn create_unit(
    api: &ApiClient,
    code: &str,
    title: &str,
    description: Option<&str>,
) -> Result<Unit, ApiError> {
    let req = Request::post(
        "/api/units",
        Some(json!({ "code": code, "title": title, "description": description })),
    );
    let resp = api.send(&req).await?;
    expect_ok(&resp)
}

/// `POST /api/units/{id}/lessons`: add a lesson (staff only).
///
/// # Errors
///
/// See [`ApiError`].
pub async fn create_lesson(
    api: &ApiClient,
    unit_id: &str,
    title: &str,
    content: Option<&str>,
) -> Result<Lesson, ApiError> {
    let req = Request::post(
        format!("/api/units/{unit_id}/lessons"),
        Some(json!({ "title": title, "content": content })),
    );
    let resp = api.send(&req).await?;
    expect_ok(&resp)
}

/// `GET /api/assignments`: assignments across the caller's units.
///
/// # Errors
///
/// See [`ApiError`].
pub async fn fetch_assignments(api: &ApiClient) -> Result<Vec<Assignment>, ApiError> {
    let resp = api.send(&Request::get("/api/assignments")).await?;
    expect_ok(&resp)
}

/// `POST /api/assignments/{id}/submissions`: submit text work.
///
/// # Errors
///
/// See [`ApiError`].
pub async fn submit_assignment(
    api: &ApiClient,
    assignment_id: &str,
    body: &str,
) -> Result<AssignmentSubmission, ApiError> {
    let req = Request::post(
        format!("/api/assignments/{assignment_id}/submissions"),
        Some(json!({ "body": body })),
    );
    let resp = api.send(&req).await?;
    expect_ok(&resp)
}

/// `GET /api/assignments/{id}/submissions/mine`: the caller's submission,
/// or `None` when nothing has been handed in yet.
///
/// # Errors
///
/// See [`ApiError`].
pub async fn fetch_my_submission(
    api: &ApiClient,
    assignment_id: &str,
) -> Result<Option<AssignmentSubmission>, ApiError> {
    let resp = api
        .send(&Request::get(format!(
            "/api/assignments/{assignment_id}/submissions/mine"
        )))
        .await?;
    if resp.status == 404 {
        return Ok(None);
    }
    expect_ok(&resp).map(Some)
}

/// `GET /api/messages`: the caller's inbox and sent mail, newest first.
///
/// # Errors
///
/// See [`ApiError`].
pub async fn fetch_messages(api: &ApiClient) -> Result<Vec<Message>, ApiError> {
    let resp = api.send(&Request::get("/api/messages")).await?;
    expect_ok(&resp)
}

/// `POST /api/messages`: send a direct message by recipient email.
///
/// # Errors
///
/// See [`ApiError`].
pub async fn send_message(
    api: &ApiClient,
    recipient_email: &str,
    body: &str,
) -> Result<Message, ApiError> {
    let req = Request::post(
        "/api/messages",
        Some(json!({ "recipient_email": recipient_email, "body": body })),
    );
    let resp = api.send(&req).await?;
    expect_ok(&resp)
}

/// `PATCH /api/messages/{id}/read`: mark a received message as read.
///
/// # Errors
///
/// See [`ApiError`].
pub async fn mark_message_read(api: &ApiClient, message_id: &str) -> Result<(), ApiError> {
    let resp = api
        .send(&Request::patch(
            format!("/api/messages/{message_id}/read"),
            None,
        ))
        .await?;
    if resp.ok() {
        Ok(())
    } else {
        Err(ApiError::Status(resp.status))
    }
}

/// `GET /api/marks`: the caller's mark rows across all units.
///
/// # Errors
///
/// See [`ApiError`].
pub async fn fetch_marks(api: &ApiClient) -> Result<Vec<MarkRow>, ApiError> {
    let resp = api.send(&Request::get("/api/marks")).await?;
    expect_ok(&resp)
}
