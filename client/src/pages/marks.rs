//! Marks page: per-component rows with unit totals.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::topbar::Topbar;
use crate::state::auth::AuthState;
use crate::state::marks::MarksState;
use crate::util::guard::install_route_guard;

#[component]
pub fn MarksPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let marks = expect_context::<RwSignal<MarksState>>();
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
            marks.update(|m| m.loading = true);
            let api = api.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::fetch_marks(&api.0).await {
                    Ok(rows) => marks.update(|m| m.set_loaded(rows)),
                    Err(e) => marks.update(|m| m.set_failed(e.to_string())),
                }
            });
        });
    }

    view! {
        <div class="marks-page">
            <Topbar/>

            <div class="marks-page__body">
                <h2>"Marks"</h2>

                <Show when=move || marks.get().error.is_some()>
                    <p class="marks-page__error">{move || marks.get().error.unwrap_or_default()}</p>
                </Show>

                <Show
                    when=move || !marks.get().loading
                    fallback=move || view! { <p>"Loading marks..."</p> }
                >
                    <Show
                        when=move || !marks.get().rows.is_empty()
                        fallback=move || view! { <p class="marks-page__empty">"No marks released yet."</p> }
                    >
                        <table class="marks-table">
                            <thead>
                                <tr>
                                    <th>"Unit"</th>
                                    <th>"Component"</th>
                                    <th>"Score"</th>
                                    <th>"Percent"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {move || {
                                    marks
                                        .get()
                                        .rows
                                        .into_iter()
                                        .map(|row| {
                                            let percent = row
                                                .percent()
                                                .map(|p| format!("{p:.1}%"))
                                                .unwrap_or_else(|| "-".to_owned());
                                            view! {
                                                <tr>
                                                    <td>{row.unit_code.clone()}</td>
                                                    <td>{row.component.clone()}</td>
                                                    <td>{format!("{} / {}", row.score, row.max_score)}</td>
                                                    <td>{percent}</td>
                                                </tr>
                                            }
                                        })
                                        .collect::<Vec<_>>()
                                }}
                            </tbody>
                            <tfoot>
                                {move || {
                                    marks
                                        .get()
                                        .unit_totals()
                                        .into_iter()
                                        .map(|total| {
                                            view! {
                                                <tr class="marks-table__total">
                                                    <td>{total.unit_code.clone()}</td>
                                                    <td>"Total"</td>
                                                    <td>{format!("{} / {}", total.score, total.max_score)}</td>
                                                    <td></td>
                                                </tr>
                                            }
                                        })
                                        .collect::<Vec<_>>()
                                }}
                            </tfoot>
                        </table>
                    </Show>
                </Show>
            </div>
        </div>
    }
}
