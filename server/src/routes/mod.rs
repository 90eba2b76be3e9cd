//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the REST API under `/api` and serves the compiled SPA bundle for
//! everything else, with an index.html fallback so client-side routes
//! resolve on hard refresh.

pub mod assignments;
pub mod auth;
pub mod marks;
pub mod messages;
pub mod quizzes;
pub mod units;
pub mod uploads;
pub mod users;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// REST API routes.
fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh-token", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/units", get(units::list_units).post(units::create_unit))
        .route("/api/units/{id}", get(units::unit_detail))
        .route("/api/units/{id}/lessons", post(units::create_lesson))
        .route("/api/units/{id}/enrolments", post(units::enrol))
        .route("/api/units/{id}/quizzes", post(quizzes::create_quiz))
        .route("/api/units/{id}/assignments", post(assignments::create_assignment))
        .route("/api/units/{id}/marks", post(marks::upsert_mark))
        .route("/api/quizzes/{id}", get(quizzes::get_quiz))
        .route("/api/quizzes/{id}/submissions", post(quizzes::submit_quiz))
        .route("/api/assignments", get(assignments::list_assignments))
        .route(
            "/api/assignments/{id}/submissions",
            get(assignments::list_submissions).post(assignments::submit),
        )
        .route(
            "/api/assignments/{id}/submissions/mine",
            get(assignments::my_submission),
        )
        .route("/api/submissions/{id}/mark", patch(assignments::mark_submission))
        .route("/api/messages", get(messages::list_messages).post(messages::send_message))
        .route("/api/messages/{id}/read", patch(messages::mark_read))
        .route("/api/marks", get(marks::list_marks))
        .route("/api/uploads", post(uploads::create_upload))
        .route("/api/uploads/{id}", get(uploads::download))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolve the directory holding the trunk-built SPA bundle.
fn client_dist_dir() -> PathBuf {
    std::env::var("CLIENT_DIST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../client/dist"))
}

/// Full application: API routes plus the SPA bundle with index fallback.
pub fn app(state: AppState) -> Router {
    let dist = client_dist_dir();
    let spa = ServeDir::new(&dist)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(dist.join("index.html")));

    api_routes(state).fallback_service(spa)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
