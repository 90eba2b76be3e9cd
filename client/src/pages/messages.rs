//! Messages page: inbox plus a send form.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::topbar::Topbar;
use crate::state::auth::AuthState;
use crate::state::messages::MessagesState;
use crate::util::guard::install_route_guard;

#[component]
pub fn MessagesPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let messages = expect_context::<RwSignal<MessagesState>>();
    let navigate = use_navigate();

    install_route_guard(auth, &[], navigate);

    #[cfg(feature = "csr")]
    let api = expect_context::<crate::app::Api>();

    #[cfg(feature = "csr")]
    {
        let api = api.clone();
        let requested = RwSignal::new(false);
        Effect::new(move || {
            let state = auth.get();
            if requested.get() || state.loading || state.user.is_none() {
                return;
            }
            requested.set(true);
            messages.update(|m| m.loading = true);
            let api = api.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::fetch_messages(&api.0).await {
                    Ok(items) => messages.update(|m| m.set_loaded(items)),
                    Err(e) => messages.update(|m| m.set_failed(e.to_string())),
                }
            });
        });
    }

    let my_id = move || auth.get().user.map(|u| u.id).unwrap_or_default();

    let recipient = RwSignal::new(String::new());
    let draft = RwSignal::new(String::new());

    #[cfg(feature = "csr")]
    let send_api = api.clone();
    let on_send = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let recipient_value = recipient.get().trim().to_owned();
        let draft_value = draft.get().trim().to_owned();
        if recipient_value.is_empty() || draft_value.is_empty() || messages.with(|m| m.send_pending) {
            return;
        }
        messages.update(|m| m.send_pending = true);

        #[cfg(feature = "csr")]
        {
            let api = send_api.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::send_message(&api.0, &recipient_value, &draft_value).await {
                    Ok(sent) => {
                        messages.update(|m| m.record_sent(sent));
                        draft.set(String::new());
                    }
                    Err(e) => messages.update(|m| m.set_failed(format!("Send failed: {e}"))),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (recipient_value, draft_value);
        }
    };

    #[cfg(feature = "csr")]
    let read_api = api.clone();
    let on_mark_read = Callback::new(move |message_id: String| {
        #[cfg(feature = "csr")]
        {
            let api = read_api.clone();
            leptos::task::spawn_local(async move {
                if crate::net::api::mark_message_read(&api.0, &message_id)
                    .await
                    .is_ok()
                {
                    messages.update(|m| m.mark_read(&message_id, "just now"));
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = message_id;
        }
    });

    view! {
        <div class="messages-page">
            <Topbar/>

            <div class="messages-page__body">
                <h2>
                    "Messages"
                    <Show when=move || { messages.get().unread_count(&my_id()) > 0 }>
                        <span class="messages-page__badge">
                            {move || messages.get().unread_count(&my_id())}
                        </span>
                    </Show>
                </h2>

                <form class="messages-page__compose" on:submit=on_send>
                    <input
                        class="messages-page__recipient"
                        type="email"
                        placeholder="recipient@example.com"
                        prop:value=move || recipient.get()
                        on:input=move |ev| recipient.set(event_target_value(&ev))
                    />
                    <input
                        class="messages-page__draft"
                        type="text"
                        placeholder="Write a message..."
                        prop:value=move || draft.get()
                        on:input=move |ev| draft.set(event_target_value(&ev))
                    />
                    <button class="btn btn--primary" type="submit" disabled=move || messages.get().send_pending>
                        "Send"
                    </button>
                </form>

                <Show when=move || messages.get().error.is_some()>
                    <p class="messages-page__error">
                        {move || messages.get().error.unwrap_or_default()}
                    </p>
                </Show>

                <Show
                    when=move || !messages.get().loading
                    fallback=move || view! { <p>"Loading messages..."</p> }
                >
                    <div class="messages-page__list">
                        {move || {
                            let me = my_id();
                            messages
                                .get()
                                .items
                                .into_iter()
                                .map(|message| {
                                    let incoming = message.recipient_id == me;
                                    let unread = incoming && message.read_at.is_none();
                                    let id_for_read = message.id.clone();
                                    let row_class = if unread {
                                        "message-row message-row--unread"
                                    } else {
                                        "message-row"
                                    };
                                    view! {
                                        <article class=row_class>
                                            <span class="message-row__sender">
                                                {if incoming { message.sender_name.clone() } else { "You".to_owned() }}
                                            </span>
                                            <p class="message-row__body">{message.body.clone()}</p>
                                            <span class="message-row__time">{message.sent_at.clone()}</span>
                                            <Show when=move || unread>
                                                {
                                                    let id_for_read = id_for_read.clone();
                                                    view! {
                                                        <button
                                                            class="btn message-row__read"
                                                            on:click=move |_| on_mark_read.run(id_for_read.clone())
                                                        >
                                                            "Mark read"
                                                        </button>
                                                    }
                                                }
                                            </Show>
                                        </article>
                                    }
                                })
                                .collect::<Vec<_>>()
                        }}
                    </div>
                </Show>
            </div>
        </div>
    }
}
