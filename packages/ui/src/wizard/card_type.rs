use dioxus::prelude::*;
use store::{CardType, WizardStep};

use super::{use_wizard, WizardContext, WizardFrame};
use crate::storage::make_wizard;

/// First screen: personal card or team cards.
#[component]
pub fn CardTypeStep() -> Element {
    let WizardContext { mut nav, mut notice } = use_wizard();
    let navigator = use_navigator();
    let mut submitting = use_signal(|| false);

    let mut choose = move |card_type: CardType| {
        if submitting() {
            return;
        }
        submitting.set(true);
        spawn(async move {
            // A new run never inherits the previous card's id or palette.
            nav.set(make_wizard().start(card_type).await);
            notice.set(None);
            submitting.set(false);
            if let Some(next) = WizardStep::CardType.next() {
                navigator.push(next.path());
            }
        });
    };

    rsx! {
        WizardFrame {
            step: WizardStep::CardType,
            div {
                class: "grid grid-cols-2 gap-4",
                button {
                    class: "card-type-option",
                    disabled: submitting(),
                    onclick: move |_| choose(CardType::Personal),
                    h2 { "Personal card" }
                    p { "One card with your own contact details." }
                }
                button {
                    class: "card-type-option",
                    disabled: submitting(),
                    onclick: move |_| choose(CardType::Team),
                    h2 { "Team cards" }
                    p { "Shared branding for every member of your company." }
                }
            }
        }
    }
}
