use dioxus::prelude::*;
use store::{CardTarget, WizardStep};

use super::{current_target, use_step_guard, use_wizard, WizardContext, WizardFrame};
use crate::auth::use_auth;
use crate::card_form::describe;
use crate::storage::make_wizard;
use crate::upload::{data_url, first_file};

/// Optional logo. The preview is cached right away; the upload itself may
/// fail without blocking the run.
#[component]
pub fn LogoStep() -> Element {
    let ready = use_step_guard(WizardStep::Logo);
    let WizardContext { mut nav, mut notice } = use_wizard();
    let auth = use_auth();
    let navigator = use_navigator();
    let mut picked = use_signal(|| Option::<api::Upload>::None);
    let mut submitting = use_signal(|| false);

    let go_next = move || {
        if let Some(next) = WizardStep::Logo.next() {
            navigator.push(next.path());
        }
    };

    let handle_pick = move |evt: FormEvent| async move {
        if let Some(upload) = first_file(&evt).await {
            picked.set(Some(upload));
        }
    };

    let handle_continue = move |_| {
        if submitting() {
            return;
        }
        let Some(upload) = picked() else {
            return;
        };
        submitting.set(true);
        spawn(async move {
            let wizard = make_wizard();
            let forwarded = wizard.logo_chosen(nav(), data_url(&upload)).await;
            nav.set(forwarded);

            let client = auth().client();
            let result = match current_target(&nav()).await {
                Some(CardTarget::Card(id)) => client.upload_card_logo(id, upload).await.map(|_| ()),
                Some(CardTarget::Team(id)) => client.upload_team_logo(id, upload).await.map(|_| ()),
                None => Ok(()),
            };
            if let Err(e) = result {
                tracing::warn!("Logo upload failed: {}", e);
                notice.set(Some(format!("Your logo could not be saved: {}", describe(&e))));
            }
            submitting.set(false);
            go_next();
        });
    };

    let handle_skip = move |_| {
        if submitting() {
            return;
        }
        submitting.set(true);
        spawn(async move {
            let forwarded = make_wizard().logo_skipped(nav()).await;
            nav.set(forwarded);
            submitting.set(false);
            go_next();
        });
    };

    if !ready() {
        return rsx! {
            WizardFrame { step: WizardStep::Logo, p { "Loading..." } }
        };
    }

    let preview = picked()
        .as_ref()
        .map(data_url)
        .or_else(|| nav().logo_preview);

    rsx! {
        WizardFrame {
            step: WizardStep::Logo,

            div {
                class: "flex flex-col gap-4",

                input {
                    r#type: "file",
                    accept: "image/png,image/jpeg,image/gif,image/webp,image/svg+xml",
                    onchange: handle_pick,
                }

                if let Some(src) = preview {
                    img {
                        src: "{src}",
                        alt: "Logo preview",
                        style: "max-width: 200px; max-height: 200px; object-fit: contain;",
                    }
                }

                div {
                    class: "flex gap-3",
                    button {
                        class: "btn btn-primary",
                        disabled: submitting() || picked().is_none(),
                        onclick: handle_continue,
                        if submitting() { "Uploading..." } else { "Use this logo" }
                    }
                    button {
                        class: "btn",
                        disabled: submitting(),
                        onclick: handle_skip,
                        "Skip"
                    }
                }
            }
        }
    }
}
