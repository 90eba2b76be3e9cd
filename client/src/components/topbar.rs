//! Application chrome: brand, navigation links, identity, logout.

use leptos::prelude::*;

use crate::state::auth::AuthState;

#[component]
pub fn Topbar() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();

    #[cfg(feature = "csr")]
    let api = expect_context::<crate::app::Api>();

    let identity = move || {
        auth.get()
            .user
            .map(|user| (user.name, user.role.as_str()))
            .unwrap_or_else(|| (String::new(), ""))
    };

    let on_logout = move |_| {
        #[cfg(feature = "csr")]
        {
            let api = api.clone();
            leptos::task::spawn_local(async move {
                // Local logout is unconditional; the server call is advisory.
                crate::net::api::logout(&api.0).await;
                auth.update(|a| a.apply_logout());
                if let Some(window) = web_sys::window() {
                    let _ = window.location().set_href("/login");
                }
            });
        }
    };

    view! {
        <header class="topbar">
            <a class="topbar__brand" href="/">"Coursebook"</a>
            <nav class="topbar__nav">
                <a href="/">"Units"</a>
                <a href="/assignments">"Assignments"</a>
                <a href="/messages">"Messages"</a>
                <a href="/marks">"Marks"</a>
            </nav>
            <span class="topbar__spacer"></span>
            <span class="topbar__self">
                {move || identity().0}
                " ("
                <span class="topbar__self-role">{move || identity().1}</span>
                ")"
            </span>
            <button class="btn topbar__logout" on:click=on_logout title="Logout">
                "Logout"
            </button>
        </header>
    }
}
