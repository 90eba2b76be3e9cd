use super::*;

use axum::http::StatusCode;
use time::Duration;

use crate::services::session;

// =============================================================================
// env_bool (uses unique env var names to avoid races with parallel tests)
// =============================================================================

#[test]
fn env_bool_true_variants() {
    for (i, val) in ["1", "true", "yes", "on"].iter().enumerate() {
        let key = format!("__TEST_EB_TRUE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(true), "expected true for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_false_variants() {
    for (i, val) in ["0", "false", "no", "off"].iter().enumerate() {
        let key = format!("__TEST_EB_FALSE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(false), "expected false for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_invalid_returns_none() {
    let key = "__TEST_EB_INVALID_7410__";
    unsafe { std::env::set_var(key, "maybe") };
    assert_eq!(env_bool(key), None);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_bool_unset_returns_none() {
    assert_eq!(env_bool("__TEST_EB_SURELY_UNSET_COURSEBOOK__"), None);
}

// =============================================================================
// Cookie builders: the attribute set is the contract with the client.
// =============================================================================

#[test]
fn session_cookies_names_and_values() {
    let cookies = session_cookies("A1".to_owned(), "R1".to_owned());
    assert_eq!(cookies[0].name(), ACCESS_COOKIE);
    assert_eq!(cookies[0].value(), "A1");
    assert_eq!(cookies[1].name(), REFRESH_COOKIE);
    assert_eq!(cookies[1].value(), "R1");
    assert_eq!(cookies[2].name(), MARKER_COOKIE);
    assert_eq!(cookies[2].value(), "1");
}

#[test]
fn token_cookies_are_http_only_but_marker_is_not() {
    let cookies = session_cookies("A1".to_owned(), "R1".to_owned());
    assert_eq!(cookies[0].http_only(), Some(true));
    assert_eq!(cookies[1].http_only(), Some(true));
    // The marker must stay readable from JS for the bootstrap check.
    assert_ne!(cookies[2].http_only(), Some(true));
}

#[test]
fn refresh_cookie_is_path_scoped_to_auth() {
    let cookies = session_cookies("A1".to_owned(), "R1".to_owned());
    assert_eq!(cookies[0].path(), Some("/"));
    assert_eq!(cookies[1].path(), Some("/api/auth"));
    assert_eq!(cookies[2].path(), Some("/"));
}

#[test]
fn refresh_outlives_access_token() {
    let cookies = session_cookies("A1".to_owned(), "R1".to_owned());
    let access_age = cookies[0].max_age().unwrap();
    let refresh_age = cookies[1].max_age().unwrap();
    let marker_age = cookies[2].max_age().unwrap();
    assert!(refresh_age > access_age);
    assert_eq!(marker_age, refresh_age, "marker mirrors the refresh lifetime");
}

#[test]
fn clear_cookies_zero_out_all_three() {
    let cookies = clear_session_cookies();
    for cookie in &cookies {
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}

#[test]
fn clear_cookies_match_set_cookie_paths() {
    // A clearing cookie only clears when the path matches the original.
    let set = session_cookies("A1".to_owned(), "R1".to_owned());
    let clear = clear_session_cookies();
    for (set_cookie, clear_cookie) in set.iter().zip(clear.iter()) {
        assert_eq!(set_cookie.name(), clear_cookie.name());
        assert_eq!(set_cookie.path(), clear_cookie.path());
    }
}

// =============================================================================
// Role gates
// =============================================================================

fn user_with_role(role: session::Role) -> session::SessionUser {
    session::SessionUser {
        id: uuid::Uuid::nil(),
        name: "t".into(),
        email: "t@example.com".into(),
        role,
    }
}

#[test]
fn require_staff_allows_teacher_and_admin() {
    assert!(require_staff(&user_with_role(session::Role::Teacher)).is_ok());
    assert!(require_staff(&user_with_role(session::Role::Admin)).is_ok());
}

#[test]
fn require_staff_rejects_student_with_403() {
    let err = require_staff(&user_with_role(session::Role::Student)).unwrap_err();
    assert_eq!(err, StatusCode::FORBIDDEN);
}

#[test]
fn require_admin_rejects_teacher_with_403() {
    let err = require_admin(&user_with_role(session::Role::Teacher)).unwrap_err();
    assert_eq!(err, StatusCode::FORBIDDEN);
}
