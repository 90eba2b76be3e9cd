//! Root application component with routing, context providers, and session
//! bootstrap.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::net::http::{ApiClient, Transport};
use crate::net::refresh::RefreshCoordinator;
use crate::pages::{
    assignments::AssignmentsPage, dashboard::DashboardPage, login::LoginPage, marks::MarksPage,
    messages::MessagesPage, unit::UnitPage,
};
use crate::state::{
    assignments::AssignmentsState, auth::AuthState, marks::MarksState, messages::MessagesState,
    units::{UnitDetailState, UnitsState},
};

/// Context handle for the shared API client.
#[derive(Clone)]
pub struct Api(pub Arc<ApiClient>);

/// Root application component.
///
/// Provides all shared state contexts, wires the refresh coordinator's hooks
/// to the auth store, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::default());
    let units = RwSignal::new(UnitsState::default());
    let unit_detail = RwSignal::new(UnitDetailState::default());
    let assignments = RwSignal::new(AssignmentsState::default());
    let messages = RwSignal::new(MessagesState::default());
    let marks = RwSignal::new(MarksState::default());

    provide_context(auth);
    provide_context(units);
    provide_context(unit_detail);
    provide_context(assignments);
    provide_context(messages);
    provide_context(marks);

    let api = Api(Arc::new(build_api_client(auth)));
    provide_context(api.clone());

    bootstrap_session(auth, &api);

    view! {
        <Title text="Coursebook"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("") view=DashboardPage/>
                <Route path=(StaticSegment("units"), ParamSegment("id")) view=UnitPage/>
                <Route path=StaticSegment("assignments") view=AssignmentsPage/>
                <Route path=StaticSegment("messages") view=MessagesPage/>
                <Route path=StaticSegment("marks") view=MarksPage/>
            </Routes>
        </Router>
    }
}

/// Build the per-session API client. The refresh coordinator's hooks are the
/// only writers of refresh outcomes into the auth store, and its failure hook
/// is the single place a dead session forces navigation to `/login`.
fn build_api_client(auth: RwSignal<AuthState>) -> ApiClient {
    let coordinator = RefreshCoordinator::new(
        move |user| auth.update(|a| a.apply_refresh_success(user)),
        move || {
            auth.update(|a| a.apply_refresh_failure());
            redirect_to_login();
        },
    );
    ApiClient::new(transport(), coordinator)
}

fn transport() -> Arc<dyn Transport> {
    #[cfg(feature = "csr")]
    {
        Arc::new(crate::net::http::GlooTransport)
    }
    #[cfg(not(feature = "csr"))]
    {
        Arc::new(crate::net::http::UnavailableTransport)
    }
}

fn redirect_to_login() {
    #[cfg(feature = "csr")]
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(crate::util::guard::LOGIN_ROUTE);
    }
}

/// Resolve the session on app load.
///
/// Policy: the `session_active` marker cookie is a cheap local check for
/// "could a refresh possibly succeed". With no marker we settle as logged out
/// without touching the network; with a marker we make one `/api/auth/me`
/// call, which rides the normal pipeline and therefore performs at most one
/// refresh cycle before resolving.
fn bootstrap_session(auth: RwSignal<AuthState>, api: &Api) {
    #[cfg(feature = "csr")]
    {
        let bootstrap_api = api.0.clone();
        leptos::task::spawn_local(async move {
            if !crate::util::cookie::session_marker_present() {
                auth.update(|a| a.settle_logged_out());
                return;
            }
            match crate::net::api::fetch_current_user(&bootstrap_api).await {
                Ok(user) => auth.update(|a| a.apply_refresh_success(Some(user))),
                Err(_) => auth.update(|a| a.apply_refresh_failure()),
            }
        });
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = api;
        auth.update(AuthState::settle_logged_out);
    }
}
