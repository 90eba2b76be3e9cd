//! Route guarding as a navigation-intent decision.
//!
//! DESIGN
//! ======
//! `decide` is a pure function from auth state + role requirements to a
//! [`RouteDecision`]; the hosting router performs the actual navigation via
//! [`install_route_guard`]. Keeping policy separate from the side effect
//! makes every branch testable without a browser.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::net::types::Role;
use crate::state::auth::AuthState;

/// Where unauthenticated and unauthorized navigations land.
pub const LOGIN_ROUTE: &str = "/login";

/// Outcome of evaluating a navigation target against the current session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session state is still resolving; render nothing, decide later.
    /// Redirecting here would flash past a refresh that is about to succeed.
    Pending,
    Allow,
    Redirect { to: String, reason: Option<String> },
}

/// Evaluate a route with `required_roles` (empty = any authenticated user).
#[must_use]
pub fn decide(auth: &AuthState, required_roles: &[Role]) -> RouteDecision {
    if auth.loading {
        return RouteDecision::Pending;
    }
    let Some(user) = &auth.user else {
        return RouteDecision::Redirect { to: LOGIN_ROUTE.to_owned(), reason: None };
    };
    if required_roles.is_empty() || required_roles.contains(&user.role) {
        RouteDecision::Allow
    } else {
        let roles = required_roles
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(" or ");
        RouteDecision::Redirect {
            to: LOGIN_ROUTE.to_owned(),
            reason: Some(format!("{roles} access required")),
        }
    }
}

/// Build the concrete navigation target for a redirect, carrying the reason
/// as a query parameter the login page can display.
#[must_use]
pub fn redirect_target(to: &str, reason: Option<&str>) -> String {
    match reason {
        Some(reason) => format!("{to}?reason={}", encode_reason(reason)),
        None => to.to_owned(),
    }
}

/// Minimal query-value encoding: spaces become `+`, anything else
/// non-alphanumeric is dropped. Reasons are short human-readable phrases,
/// not arbitrary data.
fn encode_reason(reason: &str) -> String {
    reason
        .chars()
        .filter_map(|c| {
            if c == ' ' {
                Some('+')
            } else if c.is_ascii_alphanumeric() || c == '-' {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}

/// Inverse of [`encode_reason`], for the login page.
#[must_use]
pub fn decode_reason(raw: &str) -> String {
    raw.replace('+', " ")
}

/// Re-evaluate the guard whenever auth state changes and navigate on a
/// redirect decision. Route components install this once on mount.
pub fn install_route_guard<F>(auth: RwSignal<AuthState>, required_roles: &'static [Role], navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || match decide(&auth.get(), required_roles) {
        RouteDecision::Pending | RouteDecision::Allow => {}
        RouteDecision::Redirect { to, reason } => {
            navigate(&redirect_target(&to, reason.as_deref()), NavigateOptions::default());
        }
    });
}
