//! # Card-creation wizard screens
//!
//! [`WizardProvider`] owns the navigation payload ([`WizardNav`]) as a context
//! signal; every step component reads it, records its choice through
//! [`store::Wizard`] (which also writes the durable cache) and forwards the
//! updated payload by setting the signal before navigating on.
//!
//! Entry is guarded by [`use_step_guard`]: the payload is first hydrated from
//! the cache, then [`store::Wizard::entry_step`] decides whether the requested
//! screen can be shown or the user must be sent back to an earlier one.
//!
//! Saves made on the way (logo, colors, template) never block the user. A
//! failure is stored in the context's `notice` and shown by the next screen.

use api::{ApiClient, ClientError, StyleInput};
use dioxus::prelude::*;
use store::{CardTarget, WizardNav, WizardStep};

use crate::storage::make_wizard;

mod card_type;
mod color;
mod info;
mod logo;
mod preview;
mod template;

pub use card_type::CardTypeStep;
pub use color::{ColorRole, ColorStep};
pub use info::InfoStep;
pub use logo::LogoStep;
pub use preview::PreviewStep;
pub use template::TemplateStep;

/// Shared wizard state handed to every step.
#[derive(Clone, Copy, PartialEq)]
pub struct WizardContext {
    pub nav: Signal<WizardNav>,
    /// A save that failed on the previous step.
    pub notice: Signal<Option<String>>,
}

pub fn use_wizard() -> WizardContext {
    use_context::<WizardContext>()
}

#[component]
pub fn WizardProvider(children: Element) -> Element {
    let nav = use_signal(WizardNav::default);
    let notice = use_signal(|| Option::<String>::None);
    use_context_provider(|| WizardContext { nav, notice });

    rsx! {
        {children}
    }
}

/// Hydrate the payload from the cache and redirect when `step` cannot be
/// entered yet. The returned signal turns `true` once the step may render.
pub fn use_step_guard(step: WizardStep) -> Signal<bool> {
    let WizardContext { mut nav, .. } = use_wizard();
    let mut ready = use_signal(|| false);
    let navigator = use_navigator();

    let _ = use_resource(move || async move {
        let wizard = make_wizard();
        let snapshot = nav.peek().clone();
        let hydrated = wizard.hydrate(snapshot).await;
        let entry = wizard.entry_step(step, &hydrated, None).await;
        nav.set(hydrated);
        if entry == step {
            ready.set(true);
        } else {
            tracing::debug!(?step, ?entry, "wizard step not reachable yet");
            navigator.replace(entry.path());
        }
    });

    ready
}

/// Target the current run is editing, if one can be resolved.
pub async fn current_target(nav: &WizardNav) -> Option<CardTarget> {
    make_wizard().target(nav, None).await.ok()
}

/// Seed the cache so a fresh run restyles an existing card or team.
pub async fn edit_design(target: CardTarget) -> WizardStep {
    let wizard = make_wizard();
    let nav = wizard.start(target.card_type()).await;
    wizard.info_saved(nav, target).await;
    WizardStep::Logo
}

/// Apply a style change to whichever row the run edits.
pub async fn save_style(
    client: &ApiClient,
    target: CardTarget,
    style: &StyleInput,
) -> Result<(), ClientError> {
    match target {
        CardTarget::Card(id) => client.update_card_style(id, style).await.map(|_| ()),
        CardTarget::Team(id) => client.update_team_style(id, style).await.map(|_| ()),
    }
}

/// Progress header, back link and the previous step's notice.
#[component]
pub fn WizardFrame(step: WizardStep, children: Element) -> Element {
    let WizardContext { mut notice, .. } = use_wizard();
    let number = step.index() + 1;
    let total = WizardStep::ALL.len();
    let percent = number * 100 / total;
    let title = step.title();

    rsx! {
        div {
            class: "wizard max-w-3xl mx-auto w-full p-6",

            div {
                class: "wizard-progress",
                style: "height: 4px; background: #e5e7eb; border-radius: 2px; margin-bottom: 1rem;",
                div { style: "height: 100%; width: {percent}%; background: #1e3a8a; border-radius: 2px;" }
            }

            p { class: "text-sm text-neutral-500", "Step {number} of {total}" }
            h1 { class: "view-title", "{title}" }

            if let Some(message) = notice() {
                div {
                    class: "px-2.5 py-2.5 mb-4 bg-amber-50 border border-amber-200 rounded text-amber-700 text-[0.8125rem]",
                    "{message} "
                    button {
                        class: "underline",
                        onclick: move |_| notice.set(None),
                        "Dismiss"
                    }
                }
            }

            {children}

            if let Some(prev) = step.prev() {
                p {
                    class: "mt-6 text-sm",
                    Link { to: prev.path(), "Back" }
                }
            }
        }
    }
}
