use api::{CardInput, CardView};
use dioxus::prelude::*;

use crate::auth::{use_auth, SignInPrompt};
use crate::card_face::{kind_for, CardFace, FaceData};
use crate::card_form::{describe, CardFields};
use crate::links;
use crate::storage::make_client;
use crate::upload::first_file;

/// Edit one personal card: contact fields, images and QR code.
#[component]
pub fn CardEditorPage(id: i64) -> Element {
    let auth = use_auth();
    let mut card = use_signal(|| Option::<CardView>::None);
    let mut fields = use_signal(CardInput::default);
    let mut status = use_signal(|| Option::<Result<String, String>>::None);
    let mut busy = use_signal(|| false);

    let templates = use_resource(move || async move {
        make_client(None).templates().await.unwrap_or_default()
    });

    let _ = use_resource(move || async move {
        match auth().client().card(id).await {
            Ok(view) => {
                fields.set(view.to_input());
                card.set(Some(view));
            }
            Err(e) => status.set(Some(Err(describe(&e)))),
        }
    });

    let handle_save = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        busy.set(true);
        spawn(async move {
            match auth().client().update_card(id, &fields()).await {
                Ok(view) => {
                    card.set(Some(view));
                    status.set(Some(Ok("Saved".to_string())));
                }
                Err(e) => status.set(Some(Err(describe(&e)))),
            }
            busy.set(false);
        });
    };

    let handle_photo = move |evt: FormEvent| async move {
        let Some(upload) = first_file(&evt).await else {
            return;
        };
        busy.set(true);
        match auth().client().upload_card_photo(id, upload).await {
            Ok(view) => card.set(Some(view)),
            Err(e) => status.set(Some(Err(describe(&e)))),
        }
        busy.set(false);
    };

    let handle_logo = move |evt: FormEvent| async move {
        let Some(upload) = first_file(&evt).await else {
            return;
        };
        busy.set(true);
        match auth().client().upload_card_logo(id, upload).await {
            Ok(view) => card.set(Some(view)),
            Err(e) => status.set(Some(Err(describe(&e)))),
        }
        busy.set(false);
    };

    let handle_qr = move |_| async move {
        busy.set(true);
        match auth().client().regenerate_card_qr(id).await {
            Ok(view) => {
                card.set(Some(view));
                status.set(Some(Ok("QR code regenerated".to_string())));
            }
            Err(e) => status.set(Some(Err(describe(&e)))),
        }
        busy.set(false);
    };

    if auth().loading {
        return rsx! { p { class: "view-page", "Loading..." } };
    }
    if !auth().signed_in() {
        return rsx! { div { class: "view-page", SignInPrompt {} } };
    }

    let Some(view) = card() else {
        return rsx! {
            div {
                class: "view-page",
                if let Some(Err(message)) = status() {
                    p { class: "text-red-600", "{message}" }
                } else {
                    p { "Loading card..." }
                }
            }
        };
    };

    let kind = kind_for(templates.read().as_deref().unwrap_or(&[]), view.template_id);
    // Live preview of unsaved edits on top of the stored images
    let face = FaceData {
        logo: view.logo.clone(),
        photo: view.profile_photo.clone(),
        qr_code: view.qr_code.clone(),
        ..FaceData::from_input(&fields())
    }
    .with_palette(view.palette());
    let client = auth().client();
    let banner = match status() {
        Some(Ok(message)) => rsx! { p { class: "text-green-700", "{message}" } },
        Some(Err(message)) => rsx! { p { class: "text-red-600", "{message}" } },
        None => rsx! {},
    };

    rsx! {
        div {
            class: "view-page max-w-5xl mx-auto w-full",

            h1 { class: "view-title", "Edit card" }

            {banner}

            div {
                class: "grid grid-cols-2 gap-8",

                form {
                    onsubmit: handle_save,
                    class: "flex flex-col gap-4",
                    CardFields { fields }
                    button {
                        class: "btn btn-primary",
                        r#type: "submit",
                        disabled: busy(),
                        "Save"
                    }
                }

                div {
                    class: "flex flex-col gap-4",
                    CardFace { face, kind }

                    label {
                        class: "field-label",
                        "Profile photo "
                        input { r#type: "file", accept: "image/*", disabled: busy(), onchange: handle_photo }
                    }
                    label {
                        class: "field-label",
                        "Logo "
                        input { r#type: "file", accept: "image/*", disabled: busy(), onchange: handle_logo }
                    }

                    div {
                        class: "flex flex-wrap gap-2",
                        button { class: "btn", disabled: busy(), onclick: handle_qr, "Regenerate QR code" }
                        a { class: "btn", href: client.card_image_url(id), download: "card.svg", "Download image" }
                        a { class: "btn", href: client.card_vcard_url(id), "Download vCard" }
                        Link { class: "btn", to: links::public_card(id), "Public page" }
                    }
                    if let Some(url) = view.qr_url.clone() {
                        p { class: "text-sm text-neutral-600", "QR code opens {url}" }
                    }
                }
            }
        }
    }
}
