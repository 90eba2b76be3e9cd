//! Assignments page: cross-unit listing with a submit dialog.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::topbar::Topbar;
use crate::net::types::Assignment;
use crate::state::assignments::AssignmentsState;
use crate::state::auth::AuthState;
use crate::util::guard::install_route_guard;

#[component]
pub fn AssignmentsPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let assignments = expect_context::<RwSignal<AssignmentsState>>();
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
            assignments.update(|a| a.loading = true);
            let api = api.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::fetch_assignments(&api.0).await {
                    Ok(items) => assignments.update(|a| a.set_loaded(items)),
                    Err(e) => assignments.update(|a| a.set_failed(e.to_string())),
                }
            });
        });
    }

    // Assignment currently open in the submit dialog.
    let active = RwSignal::new(None::<Assignment>);
    let on_dialog_cancel = Callback::new(move |()| active.set(None));

    view! {
        <div class="assignments-page">
            <Topbar/>

            <div class="assignments-page__body">
                <h2>"Assignments"</h2>

                <Show when=move || assignments.get().error.is_some()>
                    <p class="assignments-page__error">
                        {move || assignments.get().error.unwrap_or_default()}
                    </p>
                </Show>

                <Show
                    when=move || !assignments.get().loading
                    fallback=move || view! { <p>"Loading assignments..."</p> }
                >
                    <Show
                        when=move || !assignments.get().items.is_empty()
                        fallback=move || view! { <p class="assignments-page__empty">"Nothing due."</p> }
                    >
                        <div class="assignments-page__list">
                            {move || {
                                assignments
                                    .get()
                                    .items
                                    .into_iter()
                                    .map(|assignment| {
                                        let open_target = assignment.clone();
                                        let unit = assignment.unit_code.clone().unwrap_or_default();
                                        let due = assignment
                                            .due_at
                                            .clone()
                                            .map(|due| format!("Due {due}"))
                                            .unwrap_or_else(|| "No due date".to_owned());
                                        let submitted = assignments
                                            .with(|a| a.has_submitted(&assignment.id));
                                        view! {
                                            <article class="assignment-row">
                                                <span class="assignment-row__unit">{unit}</span>
                                                <h4>{assignment.title.clone()}</h4>
                                                <span class="assignment-row__due">{due}</span>
                                                <button
                                                    class="btn"
                                                    on:click=move |_| active.set(Some(open_target.clone()))
                                                >
                                                    {if submitted { "Resubmit" } else { "Submit" }}
                                                </button>
                                            </article>
                                        }
                                    })
                                    .collect::<Vec<_>>()
                            }}
                        </div>
                    </Show>
                </Show>
            </div>

            <Show when=move || active.get().is_some()>
                <SubmitDialog active=active on_cancel=on_dialog_cancel/>
            </Show>
        </div>
    }
}

/// Modal dialog showing the caller's existing submission (with mark and
/// feedback once graded) and accepting a new text submission.
#[component]
fn SubmitDialog(active: RwSignal<Option<Assignment>>, on_cancel: Callback<()>) -> impl IntoView {
    let assignments = expect_context::<RwSignal<AssignmentsState>>();
    let body = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let notice = RwSignal::new(String::new());

    #[cfg(feature = "csr")]
    let api = expect_context::<crate::app::Api>();

    let assignment_id = move || active.get().map(|a| a.id);

    // Pull the existing submission when the dialog opens.
    #[cfg(feature = "csr")]
    {
        let api = api.clone();
        let fetched_for = RwSignal::new(None::<String>);
        Effect::new(move || {
            let Some(id) = assignment_id() else {
                return;
            };
            if fetched_for.get_untracked().as_deref() == Some(id.as_str()) {
                return;
            }
            fetched_for.set(Some(id.clone()));
            let api = api.clone();
            leptos::task::spawn_local(async move {
                if let Ok(Some(submission)) =
                    crate::net::api::fetch_my_submission(&api.0, &id).await
                {
                    body.set(submission.body.clone().unwrap_or_default());
                    assignments.update(|a| a.record_submission(submission));
                }
            });
        });
    }

    let existing = move || {
        assignment_id().and_then(|id| assignments.with(|a| a.submissions.get(&id).cloned()))
    };

    let submit = Callback::new(move |()| {
        let Some(id) = assignment_id() else {
            return;
        };
        let body_value = body.get().trim().to_owned();
        if body_value.is_empty() || busy.get() {
            return;
        }
        busy.set(true);
        notice.set(String::new());

        #[cfg(feature = "csr")]
        {
            let api = api.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::submit_assignment(&api.0, &id, &body_value).await {
                    Ok(submission) => {
                        assignments.update(|a| a.record_submission(submission));
                        on_cancel.run(());
                    }
                    Err(e) => notice.set(format!("Submission failed: {e}")),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (id, body_value);
        }
    });

    view! {
        <div class="dialog-backdrop" on:click=move |_| on_cancel.run(())>
            <div class="dialog" on:click=move |ev| ev.stop_propagation()>
                <h2>{move || active.get().map(|a| a.title).unwrap_or_default()}</h2>
                {move || {
                    active
                        .get()
                        .and_then(|a| a.instructions)
                        .map(|text| view! { <p class="dialog__instructions">{text}</p> })
                }}
                {move || {
                    existing().and_then(|submission| submission.mark.map(|mark| {
                        let feedback = submission.feedback.clone().unwrap_or_default();
                        view! {
                            <p class="dialog__mark">
                                "Marked: " {format!("{mark}")}
                                <span class="dialog__feedback">{feedback}</span>
                            </p>
                        }
                    }))
                }}
                <label class="dialog__label">
                    "Your Work"
                    <textarea
                        class="dialog__input dialog__input--area"
                        prop:value=move || body.get()
                        on:input=move |ev| body.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <Show when=move || !notice.get().is_empty()>
                    <p class="dialog__error">{move || notice.get()}</p>
                </Show>
                <div class="dialog__actions">
                    <button class="btn" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button class="btn btn--primary" disabled=move || busy.get() on:click=move |_| submit.run(())>
                        "Hand In"
                    </button>
                </div>
            </div>
        </div>
    }
}
