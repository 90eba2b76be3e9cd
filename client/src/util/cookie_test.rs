use super::*;

#[test]
fn present_when_only_cookie() {
    assert!(cookie_present("session_active=1", SESSION_MARKER_COOKIE));
}

#[test]
fn present_among_other_cookies() {
    assert!(cookie_present(
        "theme=dark; session_active=1; lang=en",
        SESSION_MARKER_COOKIE
    ));
}

#[test]
fn absent_from_empty_header() {
    assert!(!cookie_present("", SESSION_MARKER_COOKIE));
}

#[test]
fn absent_when_other_cookies_only() {
    assert!(!cookie_present("theme=dark; lang=en", SESSION_MARKER_COOKIE));
}

#[test]
fn empty_value_counts_as_absent() {
    // A cleared cookie can linger as `session_active=` until expiry.
    assert!(!cookie_present("session_active=", SESSION_MARKER_COOKIE));
}

#[test]
fn name_must_match_exactly() {
    assert!(!cookie_present("xsession_active=1", SESSION_MARKER_COOKIE));
    assert!(!cookie_present("session_active_old=1", SESSION_MARKER_COOKIE));
}

#[test]
fn whitespace_around_pairs_is_tolerated() {
    assert!(cookie_present("theme=dark;  session_active=1", SESSION_MARKER_COOKIE));
}
