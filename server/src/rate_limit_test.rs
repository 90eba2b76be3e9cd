use super::*;

use std::time::{Duration, Instant};

// =============================================================================
// check_and_record
// =============================================================================

#[test]
fn attempts_under_limit_pass() {
    let limiter = RateLimiter::with_limits(3, Duration::from_secs(60));
    let now = Instant::now();
    for _ in 0..3 {
        assert!(limiter.check_and_record_at("a@example.com", now).is_ok());
    }
}

#[test]
fn attempt_over_limit_is_rejected() {
    let limiter = RateLimiter::with_limits(3, Duration::from_secs(60));
    let now = Instant::now();
    for _ in 0..3 {
        limiter.check_and_record_at("a@example.com", now).unwrap();
    }
    let err = limiter
        .check_and_record_at("a@example.com", now)
        .unwrap_err();
    assert_eq!(err.limit, 3);
    assert_eq!(err.window_secs, 60);
}

#[test]
fn keys_are_limited_independently() {
    let limiter = RateLimiter::with_limits(1, Duration::from_secs(60));
    let now = Instant::now();
    limiter.check_and_record_at("a@example.com", now).unwrap();
    assert!(limiter.check_and_record_at("b@example.com", now).is_ok());
    assert!(limiter.check_and_record_at("a@example.com", now).is_err());
}

#[test]
fn window_expiry_frees_capacity() {
    let limiter = RateLimiter::with_limits(2, Duration::from_secs(60));
    let start = Instant::now();
    limiter.check_and_record_at("a@example.com", start).unwrap();
    limiter.check_and_record_at("a@example.com", start).unwrap();
    assert!(limiter.check_and_record_at("a@example.com", start).is_err());

    // Just past the window, the earliest attempts fall out.
    let later = start + Duration::from_secs(61);
    assert!(limiter.check_and_record_at("a@example.com", later).is_ok());
}

#[test]
fn rejected_attempt_is_not_recorded() {
    let limiter = RateLimiter::with_limits(1, Duration::from_secs(60));
    let start = Instant::now();
    limiter.check_and_record_at("a@example.com", start).unwrap();
    // Several rejected attempts must not extend the window's occupancy.
    for _ in 0..5 {
        assert!(limiter.check_and_record_at("a@example.com", start).is_err());
    }
    let later = start + Duration::from_secs(61);
    assert!(limiter.check_and_record_at("a@example.com", later).is_ok());
}

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_falls_back_on_missing_var() {
    assert_eq!(env_parse("__SURELY_UNSET_RATE_LIMIT_VAR__", 7_usize), 7);
}

#[test]
fn env_parse_reads_valid_values() {
    let key = "__TEST_RATE_LIMIT_VALID_314__";
    unsafe { std::env::set_var(key, "42") };
    assert_eq!(env_parse(key, 7_usize), 42);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_parse_falls_back_on_garbage() {
    let key = "__TEST_RATE_LIMIT_GARBAGE_159__";
    unsafe { std::env::set_var(key, "not-a-number") };
    assert_eq!(env_parse(key, 7_usize), 7);
    unsafe { std::env::remove_var(key) };
}
