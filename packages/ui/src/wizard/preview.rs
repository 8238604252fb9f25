use dioxus::prelude::*;
use store::{CardTarget, Palette, WizardNav, WizardStep};

use super::{current_target, use_step_guard, use_wizard, WizardContext, WizardFrame};
use crate::auth::use_auth;
use crate::card_face::{kind_for, CardFace, FaceData};
use crate::card_form::describe;
use crate::links;
use crate::storage::make_wizard;

/// What the preview shows for the run's target.
#[derive(Debug, Clone, PartialEq)]
struct Finished {
    target: CardTarget,
    face: FaceData,
}

/// Choices made in this run win over what the server returned, so a save
/// that failed on the way still shows up here.
fn overlay(face: FaceData, nav: &WizardNav) -> FaceData {
    let palette = Palette::from_parts(
        nav.primary_color.clone().or(Some(face.palette.primary.clone())),
        nav.secondary_color.clone().or(Some(face.palette.secondary.clone())),
    );
    face.with_palette(palette).with_logo(nav.logo_preview.clone())
}

#[component]
pub fn PreviewStep() -> Element {
    let ready = use_step_guard(WizardStep::Preview);
    let WizardContext { mut nav, mut notice } = use_wizard();
    let auth = use_auth();
    let navigator = use_navigator();
    let mut submitting = use_signal(|| false);

    let loaded = use_resource(move || async move {
        if !ready() {
            return None;
        }
        let client = auth().client();
        let snapshot = nav.peek().clone();
        let target = current_target(&snapshot).await?;
        let templates = client.templates().await.unwrap_or_default();
        let result = match target {
            CardTarget::Card(id) => client
                .card(id)
                .await
                .map(|card| (FaceData::from_card(&card), card.template_id)),
            CardTarget::Team(id) => client
                .team(id)
                .await
                .map(|team| (FaceData::from_team(&team), team.template_id)),
        };
        Some(result.map(|(face, template_id)| {
            let template_id = snapshot.template_id.or(template_id);
            (
                Finished {
                    target,
                    face: overlay(face, &snapshot),
                },
                kind_for(&templates, template_id),
            )
        }))
    });

    let handle_finish = move |_| {
        if submitting() {
            return;
        }
        submitting.set(true);
        spawn(async move {
            match make_wizard().finish(&nav(), None).await {
                Ok(target) => {
                    nav.set(WizardNav::default());
                    notice.set(None);
                    navigator.push(links::target(target));
                }
                Err(e) => {
                    notice.set(Some(e.to_string()));
                    submitting.set(false);
                }
            }
        });
    };

    if !ready() {
        return rsx! {
            WizardFrame { step: WizardStep::Preview, p { "Loading..." } }
        };
    }

    let body = match &*loaded.read() {
        None | Some(None) => rsx! { p { "Loading preview..." } },
        Some(Some(Err(e))) => {
            let message = describe(e);
            rsx! {
                div {
                    class: "px-2.5 py-2.5 bg-red-50 border border-red-200 rounded text-red-600 text-[0.8125rem]",
                    "{message}"
                }
            }
        }
        Some(Some(Ok((finished, kind)))) => {
            let card_id = match finished.target {
                CardTarget::Card(id) => Some(id),
                CardTarget::Team(_) => None,
            };
            let client = auth().client();
            rsx! {
                CardFace { face: finished.face.clone(), kind: *kind }
                if let Some(id) = card_id {
                    div {
                        class: "flex gap-4 mt-4 text-sm",
                        a { href: client.card_image_url(id), download: "card.svg", "Download image" }
                        a { href: client.card_vcard_url(id), "Download vCard" }
                        Link { to: links::public_card(id), "Public page" }
                    }
                }
            }
        }
    };

    rsx! {
        WizardFrame {
            step: WizardStep::Preview,

            {body}

            button {
                class: "btn btn-primary mt-6",
                disabled: submitting(),
                onclick: handle_finish,
                if submitting() { "Finishing..." } else { "Finish" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::HexColor;

    #[test]
    fn test_overlay_prefers_run_choices() {
        let saved = FaceData {
            name: "Ada".to_string(),
            palette: Palette::from_parts(Some(HexColor::parse("#000").unwrap()), None),
            ..Default::default()
        };
        let nav = WizardNav {
            secondary_color: Some(HexColor::parse("#abcdef").unwrap()),
            logo_preview: Some("data:image/png;base64,AA".to_string()),
            ..Default::default()
        };

        let face = overlay(saved, &nav);
        assert_eq!(face.palette.primary.as_str(), "#000000");
        assert_eq!(face.palette.secondary.as_str(), "#abcdef");
        assert_eq!(face.logo.as_deref(), Some("data:image/png;base64,AA"));
    }
}
