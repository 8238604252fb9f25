//! Pages reached by scanning a QR code. They work without signing in.

use dioxus::prelude::*;

use crate::auth::use_auth;
use crate::card_face::{kind_for, CardFace, FaceData};
use crate::card_form::describe;
use crate::links;
use crate::storage::make_client;

#[component]
pub fn PublicCardPage(id: i64) -> Element {
    let auth = use_auth();
    let mut saving = use_signal(|| false);
    let mut saved = use_signal(|| Option::<Result<String, String>>::None);

    let loaded = use_resource(move || async move {
        let client = make_client(None);
        let templates = client.templates().await.unwrap_or_default();
        client.card(id).await.map(|card| {
            let kind = kind_for(&templates, card.template_id);
            (card, kind)
        })
    });

    let handle_save = move |_| {
        if saving() {
            return;
        }
        saving.set(true);
        spawn(async move {
            match auth().client().save_contact(id).await {
                Ok(_) => saved.set(Some(Ok("Saved to your contacts".to_string()))),
                Err(e) if e.status() == Some(409) => {
                    saved.set(Some(Ok("Already in your contacts".to_string())))
                }
                Err(e) => saved.set(Some(Err(describe(&e)))),
            }
            saving.set(false);
        });
    };

    let body = match &*loaded.read() {
        None => rsx! { p { "Loading card..." } },
        Some(Err(e)) => {
            let message = describe(e);
            rsx! { p { class: "text-red-600", "{message}" } }
        }
        Some(Ok((card, kind))) => {
            let state = auth();
            let own = state.user.as_ref().map(|u| u.id) == Some(card.user_id);
            let can_save = state.signed_in() && !own;
            let client = make_client(None);
            let bio = card.bio.clone();
            let outcome = match saved() {
                Some(Ok(message)) => rsx! { p { class: "mt-3 text-green-700", "{message}" } },
                Some(Err(message)) => rsx! { p { class: "mt-3 text-red-600", "{message}" } },
                None => rsx! {},
            };
            rsx! {
                CardFace { face: FaceData::from_card(card), kind: *kind }
                if let Some(bio) = bio {
                    p { class: "mt-4 text-neutral-700", "{bio}" }
                }
                div {
                    class: "flex flex-wrap gap-2 mt-6",
                    a { class: "btn btn-primary", href: client.card_vcard_url(id), "Download vCard" }
                    a { class: "btn", href: client.card_image_url(id), download: "card.svg", "Download image" }
                    if can_save {
                        button {
                            class: "btn",
                            disabled: saving(),
                            onclick: handle_save,
                            if saving() { "Saving..." } else { "Save contact" }
                        }
                    } else if !state.signed_in() {
                        Link { class: "btn", to: links::LOGIN, "Sign in to save" }
                    }
                }
                {outcome}
            }
        }
    };

    rsx! {
        div {
            class: "view-page max-w-xl mx-auto w-full",
            {body}
        }
    }
}

#[component]
pub fn PublicMemberPage(team_id: i64, member_id: i64) -> Element {
    let loaded = use_resource(move || async move {
        let client = make_client(None);
        let templates = client.templates().await.unwrap_or_default();
        client.member(team_id, member_id).await.map(|view| {
            let kind = kind_for(&templates, view.template_id);
            (view, kind)
        })
    });

    let body = match &*loaded.read() {
        None => rsx! { p { "Loading card..." } },
        Some(Err(e)) => {
            let message = describe(e);
            rsx! { p { class: "text-red-600", "{message}" } }
        }
        Some(Ok((view, kind))) => {
            let email = view.member.email.clone();
            let phone = view.member.phone.clone();
            rsx! {
                CardFace { face: FaceData::from_member(view), kind: *kind }
                div {
                    class: "flex flex-wrap gap-2 mt-6",
                    if let Some(email) = email {
                        a { class: "btn", href: "mailto:{email}", "Email" }
                    }
                    if let Some(phone) = phone {
                        a { class: "btn", href: "tel:{phone}", "Call" }
                    }
                }
            }
        }
    };

    rsx! {
        div {
            class: "view-page max-w-xl mx-auto w-full",
            {body}
        }
    }
}
