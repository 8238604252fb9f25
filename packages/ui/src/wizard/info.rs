use api::{CardInput, TeamInput};
use dioxus::prelude::*;
use store::{CardTarget, CardType, WizardStep};

use super::{current_target, use_step_guard, use_wizard, WizardContext, WizardFrame};
use crate::auth::{use_auth, SignInPrompt};
use crate::card_face::{CardFace, FaceData};
use crate::card_form::{describe, CardFields};
use crate::storage::make_wizard;

/// Contact details for a personal card, or the company name for a team.
/// Creates the row on first save and updates it when the run already has one.
#[component]
pub fn InfoStep() -> Element {
    let ready = use_step_guard(WizardStep::Info);
    let WizardContext { mut nav, .. } = use_wizard();
    let auth = use_auth();
    let navigator = use_navigator();

    let mut fields = use_signal(CardInput::default);
    let mut company = use_signal(String::new);
    let mut existing = use_signal(|| Option::<CardTarget>::None);
    let mut error = use_signal(|| Option::<String>::None);
    let mut submitting = use_signal(|| false);

    // Prefill from the saved row when coming back to this step
    let _ = use_resource(move || async move {
        if !ready() || !auth().signed_in() {
            return;
        }
        let snapshot = nav.peek().clone();
        let Some(target) = current_target(&snapshot).await else {
            return;
        };
        let client = auth.peek().client();
        match target {
            CardTarget::Card(id) => match client.card(id).await {
                Ok(card) => {
                    fields.set(card.to_input());
                    existing.set(Some(target));
                }
                Err(e) => tracing::warn!("Failed to load card {}: {}", id, e),
            },
            CardTarget::Team(id) => match client.team(id).await {
                Ok(team) => {
                    company.set(team.company_name);
                    existing.set(Some(target));
                }
                Err(e) => tracing::warn!("Failed to load team {}: {}", id, e),
            },
        }
    });

    let card_type = nav().card_type.unwrap_or(CardType::Personal);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        submitting.set(true);
        error.set(None);
        spawn(async move {
            let client = auth().client();
            let saved = match (card_type, existing()) {
                (CardType::Personal, Some(CardTarget::Card(id))) => client
                    .update_card(id, &fields())
                    .await
                    .map(|card| CardTarget::Card(card.id)),
                (CardType::Personal, _) => client
                    .create_card(&fields())
                    .await
                    .map(|card| CardTarget::Card(card.id)),
                (CardType::Team, existing) => {
                    let input = TeamInput {
                        company_name: company(),
                        ..Default::default()
                    };
                    match existing {
                        Some(CardTarget::Team(id)) => client.update_team(id, &input).await,
                        _ => client.create_team(&input).await,
                    }
                    .map(|team| CardTarget::Team(team.id))
                }
            };

            match saved {
                Ok(target) => {
                    let forwarded = make_wizard().info_saved(nav(), target).await;
                    nav.set(forwarded);
                    submitting.set(false);
                    if let Some(next) = WizardStep::Info.next() {
                        navigator.push(next.path());
                    }
                }
                Err(e) => {
                    error.set(Some(describe(&e)));
                    submitting.set(false);
                }
            }
        });
    };

    if !ready() || auth().loading {
        return rsx! {
            WizardFrame { step: WizardStep::Info, p { "Loading..." } }
        };
    }

    if !auth().signed_in() {
        return rsx! {
            WizardFrame { step: WizardStep::Info, SignInPrompt {} }
        };
    }

    let preview = FaceData::from_input(&fields()).with_palette(store::Palette::from_parts(
        nav().primary_color,
        nav().secondary_color,
    ));

    rsx! {
        WizardFrame {
            step: WizardStep::Info,

            form {
                onsubmit: handle_submit,
                class: "flex flex-col gap-4",

                if let Some(err) = error() {
                    div {
                        class: "px-2.5 py-2.5 bg-red-50 border border-red-200 rounded text-red-600 text-[0.8125rem]",
                        "{err}"
                    }
                }

                if card_type == CardType::Personal {
                    div {
                        class: "grid grid-cols-2 gap-6",
                        CardFields { fields }
                        CardFace { face: preview }
                    }
                } else {
                    label { class: "field-label", "Company name" }
                    input {
                        class: "input",
                        r#type: "text",
                        required: true,
                        value: company(),
                        oninput: move |evt: FormEvent| company.set(evt.value()),
                    }
                }

                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: submitting(),
                    if submitting() { "Saving..." } else { "Continue" }
                }
            }
        }
    }
}
