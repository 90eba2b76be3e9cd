//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Single source of truth for "who is logged in": route guards, the topbar,
//! and the refresh coordinator's hooks all read and write this state through
//! the transition methods below. Authentication is derived from `user`
//! presence, so an authenticated state without a user cannot be represented.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::User;

/// Authentication state tracking the current user, loading status, and the
/// last auth-flow error (shown on the login page).
#[derive(Clone, Debug)]
pub struct AuthState {
    pub user: Option<User>,
    /// True until session bootstrap resolves, and during login submission.
    /// Route guards suspend while this is set instead of redirecting early.
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        // Starts loading: the app has not yet decided whether a session
        // exists, and a premature redirect would flash past a valid refresh.
        Self { user: None, loading: true, error: None }
    }
}

impl AuthState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Mark an auth operation as in flight.
    pub fn begin_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn apply_login_success(&mut self, user: User) {
        self.user = Some(user);
        self.loading = false;
        self.error = None;
    }

    /// Login failed: stay logged out and record the message for display.
    pub fn apply_login_failure(&mut self, message: impl Into<String>) {
        self.user = None;
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Refresh succeeded. A server that omits the user payload does not
    /// un-authenticate anyone: the previous user is kept.
    pub fn apply_refresh_success(&mut self, user: Option<User>) {
        if let Some(user) = user {
            self.user = Some(user);
        }
        self.loading = false;
        self.error = None;
    }

    /// Refresh failed terminally: the session is over.
    pub fn apply_refresh_failure(&mut self) {
        self.user = None;
        self.loading = false;
        self.error = None;
    }

    /// Local logout: immediate, independent of any network outcome.
    pub fn apply_logout(&mut self) {
        self.user = None;
        self.loading = false;
        self.error = None;
    }

    /// Bootstrap found no session marker: settle as logged out without a
    /// network round trip.
    pub fn settle_logged_out(&mut self) {
        self.user = None;
        self.loading = false;
    }
}
