//! Dashboard page listing the caller's units.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. Units load once auth has
//! resolved; staff additionally get a create-unit dialog.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::topbar::Topbar;
use crate::components::unit_card::UnitCard;
use crate::state::auth::AuthState;
use crate::state::units::UnitsState;
use crate::util::guard::install_route_guard;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let units = expect_context::<RwSignal<UnitsState>>();
    let navigate = use_navigate();

    install_route_guard(auth, &[], navigate);

    #[cfg(feature = "csr")]
    {
        let api = expect_context::<crate::app::Api>();
        let requested = RwSignal::new(false);
        Effect::new(move || {
            let state = auth.get();
            if requested.get() || state.loading || state.user.is_none() {
                return;
            }
            requested.set(true);
            units.update(|u| u.loading = true);
            let api = api.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::fetch_units(&api.0).await {
                    Ok(items) => units.update(|u| u.set_loaded(items)),
                    Err(e) => units.update(|u| u.set_failed(e.to_string())),
                }
            });
        });
    }

    let is_staff = move || {
        auth.get()
            .user
            .is_some_and(|user| user.role.is_staff())
    };

    let show_create = RwSignal::new(false);
    let on_create_cancel = Callback::new(move |()| show_create.set(false));

    view! {
        <Show
            when=move || !auth.get().loading && auth.get().user.is_some()
            fallback=move || {
                view! {
                    <div class="dashboard-page">
                        <p>{move || if auth.get().loading { "Loading..." } else { "Redirecting to login..." }}</p>
                    </div>
                }
            }
        >
            <div class="dashboard-page">
                <Topbar/>

                <div class="dashboard-page__body">
                    <div class="dashboard-page__heading">
                        <h2>"Your Units"</h2>
                        <Show when=is_staff>
                            <button class="btn btn--primary" on:click=move |_| show_create.set(true)>
                                "+ New Unit"
                            </button>
                        </Show>
                    </div>

                    <Show when=move || units.get().error.is_some()>
                        <p class="dashboard-page__error">
                            {move || units.get().error.unwrap_or_default()}
                        </p>
                    </Show>

                    <Show
                        when=move || !units.get().loading
                        fallback=move || view! { <p>"Loading units..."</p> }
                    >
                        <Show
                            when=move || !units.get().items.is_empty()
                            fallback=move || view! { <p class="dashboard-page__empty">"No units yet."</p> }
                        >
                            <div class="dashboard-page__cards">
                                {move || {
                                    units
                                        .get()
                                        .items
                                        .into_iter()
                                        .map(|unit| view! { <UnitCard unit=unit/> })
                                        .collect::<Vec<_>>()
                                }}
                            </div>
                        </Show>
                    </Show>
                </div>

                <Show when=move || show_create.get()>
                    <CreateUnitDialog on_cancel=on_create_cancel/>
                </Show>
            </div>
        </Show>
    }
}

/// Modal dialog for creating a new unit (staff only).
#[component]
fn CreateUnitDialog(on_cancel: Callback<()>) -> impl IntoView {
    let units = expect_context::<RwSignal<UnitsState>>();
    let code = RwSignal::new(String::new());
    let title = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "csr")]
    let api = expect_context::<crate::app::Api>();

    let submit = Callback::new(move |()| {
        let code_value = code.get().trim().to_ascii_uppercase();
        let title_value = title.get().trim().to_owned();
        if code_value.is_empty() || title_value.is_empty() || busy.get() {
            return;
        }
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let api = api.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::create_unit(&api.0, &code_value, &title_value, None).await {
                    Ok(unit) => {
                        units.update(|u| u.upsert(unit));
                        on_cancel.run(());
                    }
                    Err(e) => units.update(|u| u.set_failed(e.to_string())),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (code_value, title_value);
        }
    });

    view! {
        <div class="dialog-backdrop" on:click=move |_| on_cancel.run(())>
            <div class="dialog" on:click=move |ev| ev.stop_propagation()>
                <h2>"Create Unit"</h2>
                <label class="dialog__label">
                    "Unit Code"
                    <input
                        class="dialog__input"
                        type="text"
                        placeholder="e.g. COMP1010"
                        prop:value=move || code.get()
                        on:input=move |ev| code.set(event_target_value(&ev).to_ascii_uppercase())
                    />
                </label>
                <label class="dialog__label">
                    "Title"
                    <input
                        class="dialog__input"
                        type="text"
                        prop:value=move || title.get()
                        on:input=move |ev| title.set(event_target_value(&ev))
                        on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                            if ev.key() == "Enter" {
                                ev.prevent_default();
                                submit.run(());
                            }
                        }
                    />
                </label>
                <div class="dialog__actions">
                    <button class="btn" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button class="btn btn--primary" disabled=move || busy.get() on:click=move |_| submit.run(())>
                        "Create"
                    </button>
                </div>
            </div>
        </div>
    }
}
