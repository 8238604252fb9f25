use dioxus::prelude::*;
use store::CardTarget;

use crate::auth::{use_auth, SignInPrompt};
use crate::card_form::describe;
use crate::links;
use crate::wizard::edit_design;

/// The signed-in user's personal cards and teams.
#[component]
pub fn MyCardsPage() -> Element {
    let auth = use_auth();
    let navigator = use_navigator();
    let mut error = use_signal(|| Option::<String>::None);

    let mut cards = use_resource(move || async move {
        let client = auth().client();
        if client.token().is_none() {
            return Ok(Vec::new());
        }
        client.cards().await
    });
    let mut teams = use_resource(move || async move {
        let client = auth().client();
        if client.token().is_none() {
            return Ok(Vec::new());
        }
        client.teams().await
    });

    let delete = move |target: CardTarget| {
        spawn(async move {
            error.set(None);
            let client = auth().client();
            let result = match target {
                CardTarget::Card(id) => client.delete_card(id).await,
                CardTarget::Team(id) => client.delete_team(id).await,
            };
            match result {
                Ok(()) => {
                    cards.restart();
                    teams.restart();
                }
                Err(e) => error.set(Some(describe(&e))),
            }
        });
    };

    let restyle = move |target: CardTarget| {
        spawn(async move {
            let step = edit_design(target).await;
            navigator.push(step.path());
        });
    };

    if auth().loading {
        return rsx! { p { class: "view-page", "Loading..." } };
    }
    if !auth().signed_in() {
        return rsx! { div { class: "view-page", SignInPrompt {} } };
    }

    let card_rows = match &*cards.read() {
        None => rsx! { p { "Loading cards..." } },
        Some(Err(e)) => {
            let message = describe(e);
            rsx! { p { class: "text-red-600", "{message}" } }
        }
        Some(Ok(list)) if list.is_empty() => rsx! {
            p { class: "text-neutral-600", "No personal cards yet." }
        },
        Some(Ok(list)) => {
            let rows: Vec<_> = list
                .iter()
                .map(|c| (c.id, c.full_name.clone(), c.company_name.clone().unwrap_or_default()))
                .collect();
            rsx! {
                for (id, name, company) in rows {
                    div {
                        key: "card-{id}",
                        class: "list-row",
                        div {
                            Link { to: links::card_editor(id), strong { "{name}" } }
                            span { class: "ml-2 text-neutral-600", "{company}" }
                        }
                        div {
                            class: "flex gap-2",
                            Link { class: "btn", to: links::public_card(id), "View" }
                            button { class: "btn", onclick: move |_| restyle(CardTarget::Card(id)), "Restyle" }
                            button { class: "btn btn-danger", onclick: move |_| delete(CardTarget::Card(id)), "Delete" }
                        }
                    }
                }
            }
        }
    };

    let team_rows = match &*teams.read() {
        None => rsx! { p { "Loading teams..." } },
        Some(Err(e)) => {
            let message = describe(e);
            rsx! { p { class: "text-red-600", "{message}" } }
        }
        Some(Ok(list)) if list.is_empty() => rsx! {
            p { class: "text-neutral-600", "No teams yet." }
        },
        Some(Ok(list)) => {
            let rows: Vec<_> = list
                .iter()
                .map(|t| (t.id, t.company_name.clone(), t.member_count))
                .collect();
            rsx! {
                for (id, company, count) in rows {
                    div {
                        key: "team-{id}",
                        class: "list-row",
                        div {
                            Link { to: links::team(id), strong { "{company}" } }
                            span { class: "ml-2 text-neutral-600", "{count} members" }
                        }
                        div {
                            class: "flex gap-2",
                            button { class: "btn", onclick: move |_| restyle(CardTarget::Team(id)), "Restyle" }
                            button { class: "btn btn-danger", onclick: move |_| delete(CardTarget::Team(id)), "Delete" }
                        }
                    }
                }
            }
        }
    };

    rsx! {
        div {
            class: "view-page max-w-3xl mx-auto w-full",

            div {
                class: "flex justify-between items-center",
                h1 { class: "view-title", "My cards" }
                Link { class: "btn btn-primary", to: "/create/type", "New card" }
            }

            if let Some(err) = error() {
                div {
                    class: "px-2.5 py-2.5 bg-red-50 border border-red-200 rounded text-red-600 text-[0.8125rem]",
                    "{err}"
                }
            }

            h2 { class: "view-section-title", "Personal cards" }
            {card_rows}

            h2 { class: "view-section-title", "Teams" }
            {team_rows}
        }
    }
}
