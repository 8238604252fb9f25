use api::StyleInput;
use dioxus::prelude::*;
use store::{Palette, WizardStep};

use super::{current_target, save_style, use_step_guard, use_wizard, WizardContext, WizardFrame};
use crate::auth::use_auth;
use crate::card_face::{CardFace, FaceData};
use crate::card_form::describe;
use crate::storage::{make_client, make_wizard};

#[component]
pub fn TemplateStep() -> Element {
    let ready = use_step_guard(WizardStep::Template);
    let WizardContext { mut nav, mut notice } = use_wizard();
    let auth = use_auth();
    let navigator = use_navigator();
    let mut chosen = use_signal(|| Option::<i32>::None);
    let mut submitting = use_signal(|| false);

    let templates = use_resource(move || async move { make_client(None).templates().await });

    let selected = chosen().or(nav().template_id);

    let handle_continue = move |_| {
        if submitting() {
            return;
        }
        let Some(template_id) = selected else {
            return;
        };
        submitting.set(true);
        spawn(async move {
            let forwarded = make_wizard().template_chosen(nav(), template_id).await;
            nav.set(forwarded);

            if let Some(target) = current_target(&nav()).await {
                let style = StyleInput {
                    template_id: Some(template_id),
                    ..Default::default()
                };
                if let Err(e) = save_style(&auth().client(), target, &style).await {
                    tracing::warn!("Saving template failed: {}", e);
                    notice.set(Some(format!("Your template could not be saved: {}", describe(&e))));
                }
            }
            submitting.set(false);
            if let Some(next) = WizardStep::Template.next() {
                navigator.push(next.path());
            }
        });
    };

    if !ready() {
        return rsx! {
            WizardFrame { step: WizardStep::Template, p { "Loading..." } }
        };
    }

    let current = nav();
    let face = FaceData {
        name: auth().user.map(|u| u.name).unwrap_or_default(),
        ..Default::default()
    }
    .with_palette(Palette::from_parts(current.primary_color, current.secondary_color))
    .with_logo(current.logo_preview);

    let catalog = match &*templates.read() {
        None => rsx! { p { "Loading templates..." } },
        Some(Err(e)) => {
            let message = describe(e);
            rsx! {
                div {
                    class: "px-2.5 py-2.5 bg-red-50 border border-red-200 rounded text-red-600 text-[0.8125rem]",
                    "{message}"
                }
            }
        }
        Some(Ok(list)) => {
            let options: Vec<_> = list.iter().map(|t| (t.id, t.name.clone(), t.kind())).collect();
            rsx! {
                div {
                    class: "grid grid-cols-2 gap-4",
                    for (id, name, kind) in options {
                        button {
                            key: "{id}",
                            class: if selected == Some(id) { "template-option template-selected" } else { "template-option" },
                            onclick: move |_| chosen.set(Some(id)),
                            CardFace { face: face.clone(), kind }
                            p { class: "mt-2 font-medium", "{name}" }
                        }
                    }
                }
            }
        }
    };

    rsx! {
        WizardFrame {
            step: WizardStep::Template,

            {catalog}

            button {
                class: "btn btn-primary mt-6",
                disabled: submitting() || selected.is_none(),
                onclick: handle_continue,
                if submitting() { "Saving..." } else { "Continue" }
            }
        }
    }
}
