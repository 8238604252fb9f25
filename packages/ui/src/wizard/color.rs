use api::StyleInput;
use dioxus::prelude::*;
use store::{HexColor, Palette, WizardStep};

use super::{current_target, save_style, use_step_guard, use_wizard, WizardContext, WizardFrame};
use crate::auth::use_auth;
use crate::card_face::{CardFace, FaceData};
use crate::card_form::describe;
use crate::storage::make_wizard;

const SWATCHES: [&str; 10] = [
    "#1e3a8a", "#0f766e", "#15803d", "#b91c1c", "#7c3aed", "#111827", "#f59e0b", "#f472b6",
    "#0ea5e9", "#e5e7eb",
];

/// Which of the two palette colors a [`ColorStep`] picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    Primary,
    Secondary,
}

impl ColorRole {
    pub fn step(&self) -> WizardStep {
        match self {
            ColorRole::Primary => WizardStep::PrimaryColor,
            ColorRole::Secondary => WizardStep::SecondaryColor,
        }
    }

    fn pick(&self, palette: &Palette) -> HexColor {
        match self {
            ColorRole::Primary => palette.primary.clone(),
            ColorRole::Secondary => palette.secondary.clone(),
        }
    }

    fn apply(&self, palette: &mut Palette, color: HexColor) {
        match self {
            ColorRole::Primary => palette.primary = color,
            ColorRole::Secondary => palette.secondary = color,
        }
    }

    fn style(&self, color: HexColor) -> StyleInput {
        match self {
            ColorRole::Primary => StyleInput {
                primary_color: Some(color),
                ..Default::default()
            },
            ColorRole::Secondary => StyleInput {
                secondary_color: Some(color),
                ..Default::default()
            },
        }
    }
}

#[component]
pub fn ColorStep(role: ColorRole) -> Element {
    let step = role.step();
    let ready = use_step_guard(step);
    let WizardContext { mut nav, mut notice } = use_wizard();
    let auth = use_auth();
    let navigator = use_navigator();
    let mut chosen = use_signal(|| Option::<HexColor>::None);
    let mut submitting = use_signal(|| false);

    let palette = {
        let current = nav();
        let mut palette = Palette::from_parts(current.primary_color, current.secondary_color);
        if let Some(color) = chosen() {
            role.apply(&mut palette, color);
        }
        palette
    };
    let selected = role.pick(&palette);
    let value = selected.as_str().to_string();

    let handle_continue = move |_| {
        if submitting() {
            return;
        }
        submitting.set(true);
        let color = selected.clone();
        spawn(async move {
            let wizard = make_wizard();
            let forwarded = match role {
                ColorRole::Primary => wizard.primary_chosen(nav(), color.clone()).await,
                ColorRole::Secondary => wizard.secondary_chosen(nav(), color.clone()).await,
            };
            nav.set(forwarded);

            if let Some(target) = current_target(&nav()).await {
                if let Err(e) = save_style(&auth().client(), target, &role.style(color)).await {
                    // Still go forward; the color is cached and can be saved later.
                    tracing::warn!("Saving color failed: {}", e);
                    notice.set(Some(format!("Your color could not be saved: {}", describe(&e))));
                }
            }
            submitting.set(false);
            if let Some(next) = step.next() {
                navigator.push(next.path());
            }
        });
    };

    if !ready() {
        return rsx! {
            WizardFrame { step, p { "Loading..." } }
        };
    }

    let face = FaceData {
        name: auth().user.map(|u| u.name).unwrap_or_default(),
        ..Default::default()
    }
    .with_palette(palette)
    .with_logo(nav().logo_preview);

    rsx! {
        WizardFrame {
            step,

            div {
                class: "grid grid-cols-2 gap-6",

                div {
                    class: "flex flex-col gap-4",
                    div {
                        class: "flex flex-wrap gap-2",
                        for swatch in SWATCHES {
                            button {
                                key: "{swatch}",
                                class: if value == swatch { "swatch swatch-selected" } else { "swatch" },
                                style: "width: 36px; height: 36px; border-radius: 50%; background: {swatch};",
                                title: "{swatch}",
                                onclick: move |_| {
                                    if let Ok(color) = HexColor::parse(swatch) {
                                        chosen.set(Some(color));
                                    }
                                },
                            }
                        }
                    }
                    label {
                        class: "field-label",
                        "Custom color "
                        input {
                            r#type: "color",
                            value: "{value}",
                            oninput: move |evt: FormEvent| {
                                if let Ok(color) = HexColor::parse(&evt.value()) {
                                    chosen.set(Some(color));
                                }
                            },
                        }
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: submitting(),
                        onclick: handle_continue,
                        if submitting() { "Saving..." } else { "Continue" }
                    }
                }

                CardFace { face }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_applies_one_color() {
        let mut palette = Palette::default();
        let red = HexColor::parse("#f00").unwrap();
        ColorRole::Secondary.apply(&mut palette, red.clone());
        assert_eq!(palette.secondary, red);
        assert_eq!(palette.primary.as_str(), HexColor::DEFAULT_PRIMARY);

        let style = ColorRole::Primary.style(red.clone());
        assert_eq!(style.primary_color, Some(red));
        assert!(style.secondary_color.is_none());
    }

    #[test]
    fn test_swatches_parse() {
        for swatch in SWATCHES {
            assert!(HexColor::parse(swatch).is_ok(), "{swatch}");
        }
        assert_eq!(ColorRole::Secondary.step(), WizardStep::SecondaryColor);
    }
}
