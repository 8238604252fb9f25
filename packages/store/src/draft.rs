//! # Typed views over the durable cache
//!
//! [`Draft`] wraps a [`KeyValueStore`] and exposes every in-progress wizard
//! selection as a typed value. [`Session`] does the same for the auth token and
//! display name. Both read malformed entries (a hand-edited `cardId`, a color
//! that no longer parses) as absent rather than failing, so a corrupted cache
//! simply sends the user back to an earlier wizard step.
//!
//! The key names are fixed and listed in [`keys`]; the web build stores them
//! verbatim in `localStorage`, where they remain readable from dev tools.

use crate::kv::KeyValueStore;
use crate::models::{CardTarget, CardType, HexColor, Palette};

/// Fixed cache key names.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const DISPLAY_NAME: &str = "userName";
    pub const CARD_TYPE: &str = "cardType";
    pub const CARD_ID: &str = "cardId";
    pub const TEAM_ID: &str = "teamId";
    pub const PRIMARY_COLOR: &str = "primaryColor";
    pub const SECONDARY_COLOR: &str = "secondaryColor";
    pub const LOGO_PREVIEW: &str = "logoPreview";
    pub const TEMPLATE_ID: &str = "templateId";

    /// Every key written by the wizard (auth keys excluded).
    pub const WIZARD: [&str; 7] = [
        CARD_TYPE,
        CARD_ID,
        TEAM_ID,
        PRIMARY_COLOR,
        SECONDARY_COLOR,
        LOGO_PREVIEW,
        TEMPLATE_ID,
    ];
}

/// In-progress wizard selections.
#[derive(Clone, Debug)]
pub struct Draft<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Draft<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn card_type(&self) -> Option<CardType> {
        self.store.get(keys::CARD_TYPE).await?.parse().ok()
    }

    pub async fn set_card_type(&self, card_type: CardType) {
        self.store
            .set(keys::CARD_TYPE, card_type.as_str().to_string())
            .await;
    }

    pub async fn card_id(&self) -> Option<i64> {
        self.read_id(keys::CARD_ID).await
    }

    pub async fn team_id(&self) -> Option<i64> {
        self.read_id(keys::TEAM_ID).await
    }

    /// Cached id for the given card type (`cardId` or `teamId`).
    pub async fn id_for(&self, card_type: CardType) -> Option<i64> {
        self.read_id(id_key(card_type)).await
    }

    /// Record the id under the key matching the card type.
    pub async fn set_id_for(&self, card_type: CardType, id: i64) {
        self.store.set(id_key(card_type), id.to_string()).await;
    }

    /// The cached target, if both a card type and a matching id are present.
    pub async fn target(&self) -> Option<CardTarget> {
        let card_type = self.card_type().await?;
        let id = self.id_for(card_type).await?;
        Some(CardTarget::new(card_type, id))
    }

    pub async fn primary_color(&self) -> Option<HexColor> {
        HexColor::parse(&self.store.get(keys::PRIMARY_COLOR).await?).ok()
    }

    pub async fn set_primary_color(&self, color: &HexColor) {
        self.store
            .set(keys::PRIMARY_COLOR, color.as_str().to_string())
            .await;
    }

    pub async fn secondary_color(&self) -> Option<HexColor> {
        HexColor::parse(&self.store.get(keys::SECONDARY_COLOR).await?).ok()
    }

    pub async fn set_secondary_color(&self, color: &HexColor) {
        self.store
            .set(keys::SECONDARY_COLOR, color.as_str().to_string())
            .await;
    }

    /// Chosen colors with defaults filled in.
    pub async fn palette(&self) -> Palette {
        Palette::from_parts(self.primary_color().await, self.secondary_color().await)
    }

    /// Logo preview as a `data:` URL.
    pub async fn logo_preview(&self) -> Option<String> {
        self.store
            .get(keys::LOGO_PREVIEW)
            .await
            .filter(|v| v.starts_with("data:"))
    }

    pub async fn set_logo_preview(&self, data_url: String) {
        self.store.set(keys::LOGO_PREVIEW, data_url).await;
    }

    pub async fn clear_logo_preview(&self) {
        self.store.remove(keys::LOGO_PREVIEW).await;
    }

    pub async fn template_id(&self) -> Option<i32> {
        self.store.get(keys::TEMPLATE_ID).await?.trim().parse().ok()
    }

    pub async fn set_template_id(&self, template_id: i32) {
        self.store
            .set(keys::TEMPLATE_ID, template_id.to_string())
            .await;
    }

    /// Start over: drop every wizard key and record the new card type.
    pub async fn reset(&self, card_type: CardType) {
        self.clear().await;
        self.set_card_type(card_type).await;
    }

    /// Remove every wizard key. Auth keys are left alone.
    pub async fn clear(&self) {
        for key in keys::WIZARD {
            self.store.remove(key).await;
        }
    }

    async fn read_id(&self, key: &str) -> Option<i64> {
        self.store
            .get(key)
            .await?
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
    }
}

fn id_key(card_type: CardType) -> &'static str {
    match card_type {
        CardType::Personal => keys::CARD_ID,
        CardType::Team => keys::TEAM_ID,
    }
}

/// Auth token and display name.
#[derive(Clone, Debug)]
pub struct Session<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn token(&self) -> Option<String> {
        self.store
            .get(keys::TOKEN)
            .await
            .filter(|t| !t.trim().is_empty())
    }

    pub async fn display_name(&self) -> Option<String> {
        self.store.get(keys::DISPLAY_NAME).await
    }

    pub async fn sign_in(&self, token: String, display_name: String) {
        self.store.set(keys::TOKEN, token).await;
        self.store.set(keys::DISPLAY_NAME, display_name).await;
    }

    /// Forget the token, the display name and any half-finished wizard.
    pub async fn sign_out(&self) {
        self.store.remove(keys::TOKEN).await;
        self.store.remove(keys::DISPLAY_NAME).await;
        for key in keys::WIZARD {
            self.store.remove(key).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[tokio::test]
    async fn test_typed_roundtrip() {
        let draft = Draft::new(MemoryStore::new());

        draft.set_card_type(CardType::Team).await;
        draft.set_id_for(CardType::Team, 12).await;
        draft
            .set_primary_color(&HexColor::parse("#ABC").unwrap())
            .await;
        draft.set_template_id(3).await;

        assert_eq!(draft.card_type().await, Some(CardType::Team));
        assert_eq!(draft.team_id().await, Some(12));
        assert_eq!(draft.card_id().await, None);
        assert_eq!(draft.target().await, Some(CardTarget::Team(12)));
        assert_eq!(draft.palette().await.primary.as_str(), "#aabbcc");
        assert_eq!(
            draft.palette().await.secondary.as_str(),
            HexColor::DEFAULT_SECONDARY
        );
        assert_eq!(draft.template_id().await, Some(3));
    }

    #[tokio::test]
    async fn test_malformed_values_read_as_absent() {
        let store = MemoryStore::new();
        store.set(keys::CARD_TYPE, "business".to_string()).await;
        store.set(keys::CARD_ID, "not-a-number".to_string()).await;
        store.set(keys::TEAM_ID, "-4".to_string()).await;
        store.set(keys::PRIMARY_COLOR, "red".to_string()).await;
        store.set(keys::LOGO_PREVIEW, "blob:xyz".to_string()).await;

        let draft = Draft::new(store);
        assert_eq!(draft.card_type().await, None);
        assert_eq!(draft.card_id().await, None);
        assert_eq!(draft.team_id().await, None);
        assert_eq!(draft.primary_color().await, None);
        assert_eq!(draft.logo_preview().await, None);
        assert_eq!(draft.target().await, None);
    }

    #[tokio::test]
    async fn test_reset_drops_previous_run() {
        let store = MemoryStore::new();
        let draft = Draft::new(store.clone());
        draft.set_card_type(CardType::Personal).await;
        draft.set_id_for(CardType::Personal, 5).await;
        draft.set_logo_preview("data:image/png;base64,AAAA".to_string()).await;

        draft.reset(CardType::Team).await;

        assert_eq!(draft.card_type().await, Some(CardType::Team));
        assert_eq!(draft.card_id().await, None);
        assert_eq!(draft.logo_preview().await, None);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_keeps_session() {
        let store = MemoryStore::new();
        let session = Session::new(store.clone());
        let draft = Draft::new(store.clone());

        session.sign_in("jwt".to_string(), "Ada".to_string()).await;
        draft.set_card_type(CardType::Personal).await;
        draft.clear().await;

        assert_eq!(session.token().await.as_deref(), Some("jwt"));
        assert_eq!(session.display_name().await.as_deref(), Some("Ada"));
        assert_eq!(draft.card_type().await, None);
    }

    #[tokio::test]
    async fn test_sign_out_drops_everything() {
        let store = MemoryStore::new();
        let session = Session::new(store.clone());
        let draft = Draft::new(store.clone());

        session.sign_in("jwt".to_string(), "Ada".to_string()).await;
        draft.set_id_for(CardType::Personal, 1).await;
        session.sign_out().await;

        assert!(session.token().await.is_none());
        assert!(store.is_empty());
    }
}
