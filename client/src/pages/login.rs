//! Login page with email + password authentication.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::net::http::ApiError;
use crate::state::auth::AuthState;
use crate::util::guard::decode_reason;

/// Translate an auth API error into the message shown under the form.
fn login_error_message(error: &ApiError) -> String {
    match error {
        ApiError::Status(401) => "Invalid email or password.".to_owned(),
        ApiError::Status(429) => "Too many attempts. Try again shortly.".to_owned(),
        other => format!("Login failed: {other}"),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let query = use_query_map();
    let navigate = use_navigate();

    #[cfg(feature = "csr")]
    let api = expect_context::<crate::app::Api>();

    // Guard redirects land here with an optional human-readable reason.
    let guard_reason = move || {
        query
            .read()
            .get("reason")
            .map(|raw| decode_reason(&raw))
            .filter(|reason| !reason.is_empty())
    };

    // Already signed in: straight to the dashboard.
    let navigate_home = navigate.clone();
    Effect::new(move || {
        let state = auth.get();
        if !state.loading && state.user.is_some() {
            navigate_home("/", NavigateOptions::default());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let email_value = email.get().trim().to_owned();
        let password_value = password.get();
        if email_value.is_empty() || password_value.is_empty() {
            auth.update(|a| a.apply_login_failure("Enter both email and password."));
            return;
        }
        busy.set(true);
        auth.update(AuthState::begin_loading);

        #[cfg(feature = "csr")]
        {
            let api = api.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::login(&api.0, &email_value, &password_value).await {
                    Ok(body) => auth.update(|a| a.apply_login_success(body.user)),
                    Err(e) => auth.update(|a| a.apply_login_failure(login_error_message(&e))),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (email_value, password_value);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Coursebook"</h1>
                <p class="login-card__subtitle">"Sign in to your units"</p>
                <Show when=move || guard_reason().is_some()>
                    <p class="login-message login-message--notice">
                        {move || guard_reason().unwrap_or_default()}
                    </p>
                </Show>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || auth.get().error.is_some()>
                    <p class="login-message login-message--error">
                        {move || auth.get().error.unwrap_or_default()}
                    </p>
                </Show>
            </div>
        </div>
    }
}

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;
