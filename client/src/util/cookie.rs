//! Session-marker cookie inspection.
//!
//! The access and refresh tokens are HttpOnly; the client never reads them.
//! The server also sets a non-HttpOnly `session_active` marker with the same
//! lifetime as the refresh token, which lets session bootstrap skip the
//! refresh network call entirely when no session can possibly exist.

#[cfg(test)]
#[path = "cookie_test.rs"]
mod cookie_test;

/// Marker cookie name; must match the server's auth routes.
pub const SESSION_MARKER_COOKIE: &str = "session_active";

/// Whether `name` appears with a non-empty value in a `document.cookie`
/// style string (`"a=1; b=2"`).
#[must_use]
pub fn cookie_present(cookie_header: &str, name: &str) -> bool {
    cookie_header.split(';').any(|pair| {
        let mut parts = pair.trim().splitn(2, '=');
        parts.next() == Some(name) && parts.next().is_some_and(|value| !value.is_empty())
    })
}

/// Read `document.cookie` and check for the session marker.
#[cfg(feature = "csr")]
#[must_use]
pub fn session_marker_present() -> bool {
    use wasm_bindgen::JsCast;

    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.dyn_into::<web_sys::HtmlDocument>().ok())
        .and_then(|document| document.cookie().ok())
        .is_some_and(|cookies| cookie_present(&cookies, SESSION_MARKER_COOKIE))
}
