//! # Card-creation wizard state machine
//!
//! The wizard is a fixed sequence of screens ([`WizardStep`]). Each screen
//! receives a [`WizardNav`] payload from the previous one, records the user's
//! choice in the durable cache through [`Wizard`], and forwards an updated
//! payload to the next screen. The payload is the fast path; the cache is what
//! lets a reload or a deep link land on a later step and carry on.
//!
//! [`Wizard::entry_step`] guards deep links: a step that needs a saved card
//! falls back to the info step when no target can be resolved, and every step
//! falls back to the type picker when no card type is known at all.

use serde::{Deserialize, Serialize};

use crate::draft::Draft;
use crate::kv::KeyValueStore;
use crate::models::{CardTarget, CardType, HexColor};
use crate::resolve::resolve_target;

/// Wizard screens in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    CardType,
    Info,
    Logo,
    PrimaryColor,
    SecondaryColor,
    Template,
    Preview,
}

impl WizardStep {
    pub const ALL: [WizardStep; 7] = [
        WizardStep::CardType,
        WizardStep::Info,
        WizardStep::Logo,
        WizardStep::PrimaryColor,
        WizardStep::SecondaryColor,
        WizardStep::Template,
        WizardStep::Preview,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Option<WizardStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn path(&self) -> &'static str {
        match self {
            WizardStep::CardType => "/create/type",
            WizardStep::Info => "/create/info",
            WizardStep::Logo => "/create/logo",
            WizardStep::PrimaryColor => "/create/primary-color",
            WizardStep::SecondaryColor => "/create/secondary-color",
            WizardStep::Template => "/create/template",
            WizardStep::Preview => "/create/preview",
        }
    }

    pub fn from_path(path: &str) -> Option<WizardStep> {
        let path = path.trim_end_matches('/');
        Self::ALL.into_iter().find(|s| s.path() == path)
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::CardType => "Choose a card type",
            WizardStep::Info => "Your details",
            WizardStep::Logo => "Add a logo",
            WizardStep::PrimaryColor => "Primary color",
            WizardStep::SecondaryColor => "Secondary color",
            WizardStep::Template => "Pick a template",
            WizardStep::Preview => "Preview",
        }
    }

    /// Whether the step edits an already saved card or team.
    pub fn needs_target(&self) -> bool {
        *self > WizardStep::Info
    }
}

/// Navigation payload handed from one step to the next.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardNav {
    pub card_type: Option<CardType>,
    pub card_id: Option<i64>,
    pub team_id: Option<i64>,
    pub primary_color: Option<HexColor>,
    pub secondary_color: Option<HexColor>,
    pub logo_preview: Option<String>,
    pub template_id: Option<i32>,
}

impl WizardNav {
    pub fn for_target(target: CardTarget) -> Self {
        let mut nav = Self {
            card_type: Some(target.card_type()),
            ..Default::default()
        };
        nav.set_target(target);
        nav
    }

    /// Id carried for the given card type.
    pub fn id_for(&self, card_type: CardType) -> Option<i64> {
        match card_type {
            CardType::Personal => self.card_id,
            CardType::Team => self.team_id,
        }
    }

    pub fn set_target(&mut self, target: CardTarget) {
        self.card_type = Some(target.card_type());
        match target {
            CardTarget::Card(id) => self.card_id = Some(id),
            CardTarget::Team(id) => self.team_id = Some(id),
        }
    }

    /// Overlay `newer` on top of `self`; fields absent from `newer` are kept.
    pub fn merge(self, newer: WizardNav) -> WizardNav {
        WizardNav {
            card_type: newer.card_type.or(self.card_type),
            card_id: newer.card_id.or(self.card_id),
            team_id: newer.team_id.or(self.team_id),
            primary_color: newer.primary_color.or(self.primary_color),
            secondary_color: newer.secondary_color.or(self.secondary_color),
            logo_preview: newer.logo_preview.or(self.logo_preview),
            template_id: newer.template_id.or(self.template_id),
        }
    }
}

/// Error returned when a step cannot proceed with the state it was given.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("no card type selected")]
    MissingCardType,
    #[error("no saved card or team to continue with")]
    MissingTarget,
}

/// Cache-backed wizard transitions.
#[derive(Clone, Debug)]
pub struct Wizard<S: KeyValueStore> {
    draft: Draft<S>,
}

impl<S: KeyValueStore> Wizard<S> {
    pub fn new(store: S) -> Self {
        Self {
            draft: Draft::new(store),
        }
    }

    pub fn draft(&self) -> &Draft<S> {
        &self.draft
    }

    /// Begin a fresh run for `card_type`, discarding any previous selections.
    pub async fn start(&self, card_type: CardType) -> WizardNav {
        self.draft.reset(card_type).await;
        WizardNav {
            card_type: Some(card_type),
            ..Default::default()
        }
    }

    /// Fill fields missing from `nav` with cached values.
    pub async fn hydrate(&self, nav: WizardNav) -> WizardNav {
        let cached = WizardNav {
            card_type: self.draft.card_type().await,
            card_id: self.draft.card_id().await,
            team_id: self.draft.team_id().await,
            primary_color: self.draft.primary_color().await,
            secondary_color: self.draft.secondary_color().await,
            logo_preview: self.draft.logo_preview().await,
            template_id: self.draft.template_id().await,
        };
        cached.merge(nav)
    }

    /// Card type from the payload or the cache; no default.
    pub async fn card_type(&self, nav: &WizardNav) -> Result<CardType, WizardError> {
        match nav.card_type {
            Some(card_type) => Ok(card_type),
            None => self
                .draft
                .card_type()
                .await
                .ok_or(WizardError::MissingCardType),
        }
    }

    /// Resolve the row being edited.
    pub async fn target(
        &self,
        nav: &WizardNav,
        inferred: Option<CardTarget>,
    ) -> Result<CardTarget, WizardError> {
        resolve_target(&self.draft, nav, inferred)
            .await
            .ok_or(WizardError::MissingTarget)
    }

    /// The info step created or updated a row.
    pub async fn info_saved(&self, nav: WizardNav, target: CardTarget) -> WizardNav {
        self.draft.set_card_type(target.card_type()).await;
        self.draft.set_id_for(target.card_type(), target.id()).await;
        let mut nav = nav;
        nav.set_target(target);
        nav
    }

    pub async fn logo_chosen(&self, nav: WizardNav, preview: String) -> WizardNav {
        self.draft.set_logo_preview(preview.clone()).await;
        WizardNav {
            logo_preview: Some(preview),
            ..nav
        }
    }

    pub async fn logo_skipped(&self, nav: WizardNav) -> WizardNav {
        self.draft.clear_logo_preview().await;
        WizardNav {
            logo_preview: None,
            ..nav
        }
    }

    pub async fn primary_chosen(&self, nav: WizardNav, color: HexColor) -> WizardNav {
        self.draft.set_primary_color(&color).await;
        WizardNav {
            primary_color: Some(color),
            ..nav
        }
    }

    pub async fn secondary_chosen(&self, nav: WizardNav, color: HexColor) -> WizardNav {
        self.draft.set_secondary_color(&color).await;
        WizardNav {
            secondary_color: Some(color),
            ..nav
        }
    }

    pub async fn template_chosen(&self, nav: WizardNav, template_id: i32) -> WizardNav {
        self.draft.set_template_id(template_id).await;
        WizardNav {
            template_id: Some(template_id),
            ..nav
        }
    }

    /// Complete the run: resolve the target, then clear the draft.
    pub async fn finish(
        &self,
        nav: &WizardNav,
        inferred: Option<CardTarget>,
    ) -> Result<CardTarget, WizardError> {
        let target = self.target(nav, inferred).await?;
        self.draft.clear().await;
        Ok(target)
    }

    /// The step to actually show when `requested` is opened with `nav`.
    pub async fn entry_step(
        &self,
        requested: WizardStep,
        nav: &WizardNav,
        inferred: Option<CardTarget>,
    ) -> WizardStep {
        if requested == WizardStep::CardType {
            return requested;
        }

        if self.card_type(nav).await.is_err() && inferred.is_none() {
            return WizardStep::CardType;
        }

        if requested.needs_target() && self.target(nav, inferred).await.is_err() {
            return WizardStep::Info;
        }

        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn color(s: &str) -> HexColor {
        HexColor::parse(s).unwrap()
    }

    #[test]
    fn test_step_order() {
        assert_eq!(WizardStep::CardType.next(), Some(WizardStep::Info));
        assert_eq!(WizardStep::SecondaryColor.next(), Some(WizardStep::Template));
        assert_eq!(WizardStep::Preview.next(), None);
        assert_eq!(WizardStep::CardType.prev(), None);
        assert_eq!(WizardStep::Logo.prev(), Some(WizardStep::Info));
        assert!(WizardStep::Info < WizardStep::Logo);
        assert!(!WizardStep::Info.needs_target());
        assert!(WizardStep::Logo.needs_target());
    }

    #[test]
    fn test_paths_roundtrip() {
        for step in WizardStep::ALL {
            assert_eq!(WizardStep::from_path(step.path()), Some(step));
        }
        assert_eq!(
            WizardStep::from_path("/create/primary-color/"),
            Some(WizardStep::PrimaryColor)
        );
        assert_eq!(WizardStep::from_path("/create/nope"), None);
    }

    #[test]
    fn test_merge_prefers_newer() {
        let older = WizardNav {
            card_type: Some(CardType::Personal),
            card_id: Some(1),
            primary_color: Some(color("#000")),
            ..Default::default()
        };
        let newer = WizardNav {
            card_id: Some(2),
            secondary_color: Some(color("#fff")),
            ..Default::default()
        };

        let merged = older.merge(newer);
        assert_eq!(merged.card_type, Some(CardType::Personal));
        assert_eq!(merged.card_id, Some(2));
        assert_eq!(merged.primary_color, Some(color("#000000")));
        assert_eq!(merged.secondary_color, Some(color("#ffffff")));
    }

    #[tokio::test]
    async fn test_full_personal_run() {
        let store = MemoryStore::new();
        let wizard = Wizard::new(store.clone());

        let nav = wizard.start(CardType::Personal).await;
        let nav = wizard.info_saved(nav, CardTarget::Card(7)).await;
        assert_eq!(nav.card_id, Some(7));

        let nav = wizard
            .logo_chosen(nav, "data:image/png;base64,AAAA".to_string())
            .await;
        let nav = wizard.primary_chosen(nav, color("#123456")).await;
        let nav = wizard.secondary_chosen(nav, color("#654321")).await;
        let nav = wizard.template_chosen(nav, 2).await;

        assert_eq!(wizard.draft().template_id().await, Some(2));
        assert_eq!(
            wizard.draft().palette().await.secondary,
            color("#654321")
        );

        let target = wizard.finish(&nav, None).await.unwrap();
        assert_eq!(target, CardTarget::Card(7));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_reload_mid_run_resumes_from_cache() {
        let store = MemoryStore::new();
        let wizard = Wizard::new(store.clone());

        let nav = wizard.start(CardType::Team).await;
        let nav = wizard.info_saved(nav, CardTarget::Team(3)).await;
        wizard.primary_chosen(nav, color("#abcdef")).await;

        // Fresh wizard instance, empty payload: as after a page reload.
        let reloaded = Wizard::new(store.clone());
        let nav = reloaded.hydrate(WizardNav::default()).await;
        assert_eq!(nav.card_type, Some(CardType::Team));
        assert_eq!(nav.team_id, Some(3));
        assert_eq!(nav.primary_color, Some(color("#abcdef")));
        assert_eq!(
            reloaded.target(&nav, None).await,
            Ok(CardTarget::Team(3))
        );
    }

    #[tokio::test]
    async fn test_start_forgets_previous_card() {
        let wizard = Wizard::new(MemoryStore::new());
        let nav = wizard.start(CardType::Personal).await;
        wizard.info_saved(nav, CardTarget::Card(11)).await;

        let nav = wizard.start(CardType::Personal).await;
        assert_eq!(nav.card_id, None);
        assert_eq!(
            wizard.target(&nav, None).await,
            Err(WizardError::MissingTarget)
        );
    }

    #[tokio::test]
    async fn test_logo_skipped_clears_preview() {
        let wizard = Wizard::new(MemoryStore::new());
        let nav = wizard
            .logo_chosen(WizardNav::default(), "data:image/png;base64,AA".to_string())
            .await;
        let nav = wizard.logo_skipped(nav).await;
        assert_eq!(nav.logo_preview, None);
        assert_eq!(wizard.draft().logo_preview().await, None);
    }

    #[tokio::test]
    async fn test_entry_guards() {
        let wizard = Wizard::new(MemoryStore::new());

        // Nothing known: everything but the picker falls back to it.
        assert_eq!(
            wizard
                .entry_step(WizardStep::Template, &WizardNav::default(), None)
                .await,
            WizardStep::CardType
        );
        assert_eq!(
            wizard
                .entry_step(WizardStep::CardType, &WizardNav::default(), None)
                .await,
            WizardStep::CardType
        );

        // Type known but nothing saved yet: info is as far as it goes.
        let nav = wizard.start(CardType::Personal).await;
        assert_eq!(
            wizard.entry_step(WizardStep::Logo, &nav, None).await,
            WizardStep::Info
        );
        assert_eq!(
            wizard.entry_step(WizardStep::Info, &nav, None).await,
            WizardStep::Info
        );

        // Saved: later steps open.
        let nav = wizard.info_saved(nav, CardTarget::Card(5)).await;
        assert_eq!(
            wizard.entry_step(WizardStep::Preview, &nav, None).await,
            WizardStep::Preview
        );
    }

    #[tokio::test]
    async fn test_entry_uses_inferred_target() {
        let wizard = Wizard::new(MemoryStore::new());
        let step = wizard
            .entry_step(
                WizardStep::SecondaryColor,
                &WizardNav::default(),
                Some(CardTarget::Card(40)),
            )
            .await;
        assert_eq!(step, WizardStep::SecondaryColor);
        assert_eq!(wizard.draft().card_id().await, Some(40));
    }

    #[tokio::test]
    async fn test_card_type_requires_a_choice() {
        let wizard = Wizard::new(MemoryStore::new());
        assert_eq!(
            wizard.card_type(&WizardNav::default()).await,
            Err(WizardError::MissingCardType)
        );

        wizard.start(CardType::Team).await;
        assert_eq!(
            wizard.card_type(&WizardNav::default()).await,
            Ok(CardType::Team)
        );
    }

    #[tokio::test]
    async fn test_finish_without_target_fails() {
        let wizard = Wizard::new(MemoryStore::new());
        assert_eq!(
            wizard.finish(&WizardNav::default(), None).await,
            Err(WizardError::MissingTarget)
        );
    }
}
