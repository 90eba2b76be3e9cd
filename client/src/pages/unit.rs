//! Unit detail page: lessons, quizzes, and assignments for one unit.

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::components::topbar::Topbar;
use crate::state::auth::AuthState;
use crate::state::units::UnitDetailState;
use crate::util::guard::install_route_guard;

#[component]
pub fn UnitPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let detail = expect_context::<RwSignal<UnitDetailState>>();
    let params = use_params_map();
    let navigate = use_navigate();

    install_route_guard(auth, &[], navigate);

    #[cfg(feature = "csr")]
    {
        let api = expect_context::<crate::app::Api>();
        let requested = RwSignal::new(None::<String>);
        Effect::new(move || {
            let Some(unit_id) = params.read().get("id") else {
                return;
            };
            let state = auth.get();
            if state.loading || state.user.is_none() {
                return;
            }
            if requested.get_untracked().as_deref() == Some(unit_id.as_str()) {
                return;
            }
            requested.set(Some(unit_id.clone()));
            detail.update(|d| d.loading = true);
            let api = api.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::fetch_unit_detail(&api.0, &unit_id).await {
                    Ok(loaded) => detail.update(|d| d.set_loaded(loaded)),
                    Err(e) => detail.update(|d| d.set_failed(e.to_string())),
                }
            });
        });
    }

    let is_staff = move || {
        auth.get()
            .user
            .is_some_and(|user| user.role.is_staff())
    };

    let show_add_lesson = RwSignal::new(false);
    let on_add_lesson_cancel = Callback::new(move |()| show_add_lesson.set(false));

    let heading = move || {
        detail
            .get()
            .detail
            .map(|d| format!("{}: {}", d.unit.code, d.unit.title))
            .unwrap_or_else(|| "Unit".to_owned())
    };

    view! {
        <div class="unit-page">
            <Topbar/>

            <Show when=move || detail.get().error.is_some()>
                <p class="unit-page__error">{move || detail.get().error.unwrap_or_default()}</p>
            </Show>

            <Show
                when=move || !detail.get().loading && detail.get().detail.is_some()
                fallback=move || view! { <p>"Loading unit..."</p> }
            >
                <div class="unit-page__body">
                    <div class="unit-page__heading">
                        <h2>{heading}</h2>
                        <Show when=is_staff>
                            <button class="btn" on:click=move |_| show_add_lesson.set(true)>
                                "+ Add Lesson"
                            </button>
                        </Show>
                    </div>
                    {move || {
                        detail
                            .get()
                            .detail
                            .and_then(|d| d.unit.description)
                            .map(|text| view! { <p class="unit-page__description">{text}</p> })
                    }}

                    <section class="unit-page__section">
                        <h3>"Lessons"</h3>
                        {move || {
                            let lessons = detail.get().detail.map(|d| d.lessons).unwrap_or_default();
                            if lessons.is_empty() {
                                view! { <p class="unit-page__empty">"No lessons published."</p> }.into_any()
                            } else {
                                lessons
                                    .into_iter()
                                    .map(|lesson| {
                                        view! {
                                            <article class="lesson">
                                                <h4>{lesson.title}</h4>
                                                {lesson.content.map(|content| view! { <p>{content}</p> })}
                                            </article>
                                        }
                                    })
                                    .collect::<Vec<_>>()
                                    .into_any()
                            }
                        }}
                    </section>

                    <section class="unit-page__section">
                        <h3>"Quizzes"</h3>
                        {move || {
                            let quizzes = detail.get().detail.map(|d| d.quizzes).unwrap_or_default();
                            if quizzes.is_empty() {
                                view! { <p class="unit-page__empty">"No quizzes."</p> }.into_any()
                            } else {
                                quizzes
                                    .into_iter()
                                    .map(|quiz| {
                                        let meta = match quiz.duration_mins {
                                            Some(mins) => format!("{} questions · {mins} min", quiz.question_count),
                                            None => format!("{} questions", quiz.question_count),
                                        };
                                        view! {
                                            <article class="quiz-row">
                                                <h4>{quiz.title}</h4>
                                                <span class="quiz-row__meta">{meta}</span>
                                            </article>
                                        }
                                    })
                                    .collect::<Vec<_>>()
                                    .into_any()
                            }
                        }}
                    </section>

                    <section class="unit-page__section">
                        <h3>"Assignments"</h3>
                        {move || {
                            let assignments = detail.get().detail.map(|d| d.assignments).unwrap_or_default();
                            if assignments.is_empty() {
                                view! { <p class="unit-page__empty">"No assignments."</p> }.into_any()
                            } else {
                                assignments
                                    .into_iter()
                                    .map(|assignment| {
                                        let due = assignment
                                            .due_at
                                            .map(|due| format!("Due {due}"))
                                            .unwrap_or_else(|| "No due date".to_owned());
                                        view! {
                                            <article class="assignment-row">
                                                <h4>{assignment.title}</h4>
                                                <span class="assignment-row__due">{due}</span>
                                            </article>
                                        }
                                    })
                                    .collect::<Vec<_>>()
                                    .into_any()
                            }
                        }}
                    </section>
                </div>
            </Show>

            <Show when=move || show_add_lesson.get()>
                <AddLessonDialog on_cancel=on_add_lesson_cancel/>
            </Show>
        </div>
    }
}

/// Modal dialog for adding a lesson to the current unit (staff only).
#[component]
fn AddLessonDialog(on_cancel: Callback<()>) -> impl IntoView {
    let detail = expect_context::<RwSignal<UnitDetailState>>();
    let title = RwSignal::new(String::new());
    let content = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "csr")]
    let api = expect_context::<crate::app::Api>();

    let submit = Callback::new(move |()| {
        let title_value = title.get().trim().to_owned();
        let content_value = content.get().trim().to_owned();
        if title_value.is_empty() || busy.get() {
            return;
        }
        let Some(unit_id) = detail.with(|d| d.detail.as_ref().map(|x| x.unit.id.clone())) else {
            return;
        };
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let api = api.clone();
            leptos::task::spawn_local(async move {
                let content_opt = (!content_value.is_empty()).then_some(content_value.as_str());
                match crate::net::api::create_lesson(&api.0, &unit_id, &title_value, content_opt).await {
                    Ok(lesson) => {
                        detail.update(|d| {
                            if let Some(loaded) = d.detail.as_mut() {
                                loaded.lessons.push(lesson);
                            }
                        });
                        on_cancel.run(());
                    }
                    Err(e) => detail.update(|d| d.error = Some(e.to_string())),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (title_value, content_value, unit_id);
        }
    });

    view! {
        <div class="dialog-backdrop" on:click=move |_| on_cancel.run(())>
            <div class="dialog" on:click=move |ev| ev.stop_propagation()>
                <h2>"Add Lesson"</h2>
                <label class="dialog__label">
                    "Title"
                    <input
                        class="dialog__input"
                        type="text"
                        prop:value=move || title.get()
                        on:input=move |ev| title.set(event_target_value(&ev))
                    />
                </label>
                <label class="dialog__label">
                    "Content"
                    <textarea
                        class="dialog__input dialog__input--area"
                        prop:value=move || content.get()
                        on:input=move |ev| content.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <div class="dialog__actions">
                    <button class="btn" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button class="btn btn--primary" disabled=move || busy.get() on:click=move |_| submit.run(())>
                        "Add"
                    </button>
                </div>
            </div>
        </div>
    }
}
