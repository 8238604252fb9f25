use dioxus::prelude::*;

use crate::auth::{use_auth, SignInPrompt};
use crate::card_form::describe;
use crate::links;

/// Cards the user saved from public pages, newest first.
#[component]
pub fn ContactsPage() -> Element {
    let auth = use_auth();
    let mut error = use_signal(|| Option::<String>::None);

    let mut contacts = use_resource(move || async move {
        let client = auth().client();
        if client.token().is_none() {
            return Ok(Vec::new());
        }
        client.contacts().await
    });

    let remove = move |card_id: i64| {
        spawn(async move {
            error.set(None);
            match auth().client().delete_contact(card_id).await {
                Ok(()) => contacts.restart(),
                Err(e) => error.set(Some(describe(&e))),
            }
        });
    };

    if auth().loading {
        return rsx! { p { class: "view-page", "Loading..." } };
    }
    if !auth().signed_in() {
        return rsx! { div { class: "view-page", SignInPrompt {} } };
    }

    let body = match &*contacts.read() {
        None => rsx! { p { "Loading contacts..." } },
        Some(Err(e)) => {
            let message = describe(e);
            rsx! { p { class: "text-red-600", "{message}" } }
        }
        Some(Ok(list)) if list.is_empty() => rsx! {
            p { class: "text-neutral-600", "No saved contacts yet. Open someone's card and choose Save contact." }
        },
        Some(Ok(list)) => {
            let rows: Vec<_> = list
                .iter()
                .map(|c| {
                    let detail = [c.card.job_title.clone(), c.card.company_name.clone()]
                        .into_iter()
                        .flatten()
                        .collect::<Vec<_>>()
                        .join(" · ");
                    let saved = c.saved_at.format("%Y-%m-%d").to_string();
                    (c.card.id, c.card.full_name.clone(), detail, saved)
                })
                .collect();
            rsx! {
                for (card_id, name, detail, saved) in rows {
                    div {
                        key: "{card_id}",
                        class: "list-row",
                        div {
                            Link { to: links::public_card(card_id), strong { "{name}" } }
                            span { class: "ml-2 text-neutral-600", "{detail}" }
                            div { class: "text-sm text-neutral-500", "Saved {saved}" }
                        }
                        button { class: "btn btn-danger", onclick: move |_| remove(card_id), "Remove" }
                    }
                }
            }
        }
    };

    rsx! {
        div {
            class: "view-page max-w-3xl mx-auto w-full",
            h1 { class: "view-title", "Contacts" }
            if let Some(err) = error() {
                div {
                    class: "px-2.5 py-2.5 bg-red-50 border border-red-200 rounded text-red-600 text-[0.8125rem]",
                    "{err}"
                }
            }
            {body}
        }
    }
}
