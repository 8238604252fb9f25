//! # Effective-identifier resolution
//!
//! Every wizard step after "info" needs to know which card or team it is
//! editing. That id can come from three places, in decreasing order of trust:
//!
//! 1. the navigation payload handed over by the previous step,
//! 2. the durable cache (survives a reload or a deep link),
//! 3. an inferred default supplied by the caller (for example the user's most
//!    recently created card).
//!
//! [`resolve_id`] applies that precedence to raw ids. [`resolve_target`] does
//! the same for a full [`CardTarget`]: the card type is settled first
//! (payload, then cache, then `personal`), and only ids recorded for that type
//! are considered. When the winner did not come from the cache it is written
//! back, so reloading the page resolves the same row again.

use crate::draft::Draft;
use crate::kv::KeyValueStore;
use crate::models::{CardTarget, CardType};
use crate::wizard::WizardNav;

/// Where a resolved id came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdSource {
    Navigation,
    Cache,
    Inferred,
}

/// An id together with its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub id: i64,
    pub source: IdSource,
}

/// Pick the first usable id: navigation, then cache, then inferred.
/// Non-positive ids are treated as missing.
pub fn resolve_id(nav: Option<i64>, cached: Option<i64>, inferred: Option<i64>) -> Option<Resolved> {
    let usable = |id: Option<i64>| id.filter(|id| *id > 0);

    if let Some(id) = usable(nav) {
        return Some(Resolved { id, source: IdSource::Navigation });
    }
    if let Some(id) = usable(cached) {
        return Some(Resolved { id, source: IdSource::Cache });
    }
    usable(inferred).map(|id| Resolved { id, source: IdSource::Inferred })
}

/// Card type from the payload, then the cache, then `personal`.
pub async fn resolve_card_type<S: KeyValueStore>(draft: &Draft<S>, nav: &WizardNav) -> CardType {
    match nav.card_type {
        Some(card_type) => card_type,
        None => draft.card_type().await.unwrap_or_default(),
    }
}

/// Resolve the row the wizard is editing, persisting the result.
///
/// `inferred` is only used when its card type matches the resolved one.
pub async fn resolve_target<S: KeyValueStore>(
    draft: &Draft<S>,
    nav: &WizardNav,
    inferred: Option<CardTarget>,
) -> Option<CardTarget> {
    let card_type = resolve_card_type(draft, nav).await;
    let inferred_id = inferred
        .filter(|t| t.card_type() == card_type)
        .map(|t| t.id());

    let resolved = resolve_id(nav.id_for(card_type), draft.id_for(card_type).await, inferred_id)?;

    if resolved.source != IdSource::Cache {
        draft.set_card_type(card_type).await;
        draft.set_id_for(card_type, resolved.id).await;
    }

    Some(CardTarget::new(card_type, resolved.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn test_precedence() {
        assert_eq!(
            resolve_id(Some(1), Some(2), Some(3)),
            Some(Resolved { id: 1, source: IdSource::Navigation })
        );
        assert_eq!(
            resolve_id(None, Some(2), Some(3)),
            Some(Resolved { id: 2, source: IdSource::Cache })
        );
        assert_eq!(
            resolve_id(None, None, Some(3)),
            Some(Resolved { id: 3, source: IdSource::Inferred })
        );
        assert_eq!(resolve_id(None, None, None), None);
    }

    #[test]
    fn test_non_positive_ids_are_skipped() {
        assert_eq!(
            resolve_id(Some(0), Some(-1), Some(8)),
            Some(Resolved { id: 8, source: IdSource::Inferred })
        );
    }

    #[tokio::test]
    async fn test_navigation_id_is_persisted() {
        let store = MemoryStore::new();
        let draft = Draft::new(store.clone());
        let nav = WizardNav {
            card_type: Some(CardType::Team),
            team_id: Some(21),
            ..Default::default()
        };

        let target = resolve_target(&draft, &nav, None).await;
        assert_eq!(target, Some(CardTarget::Team(21)));

        // A reload arrives with an empty payload and still finds the team.
        let reloaded = resolve_target(&draft, &WizardNav::default(), None).await;
        assert_eq!(reloaded, Some(CardTarget::Team(21)));
    }

    #[tokio::test]
    async fn test_cache_beats_inferred() {
        let draft = Draft::new(MemoryStore::new());
        draft.set_card_type(CardType::Personal).await;
        draft.set_id_for(CardType::Personal, 4).await;

        let target = resolve_target(&draft, &WizardNav::default(), Some(CardTarget::Card(99))).await;
        assert_eq!(target, Some(CardTarget::Card(4)));
    }

    #[tokio::test]
    async fn test_inferred_of_other_type_is_ignored() {
        let draft = Draft::new(MemoryStore::new());
        let nav = WizardNav {
            card_type: Some(CardType::Personal),
            ..Default::default()
        };

        assert_eq!(resolve_target(&draft, &nav, Some(CardTarget::Team(3))).await, None);

        let target = resolve_target(&draft, &nav, Some(CardTarget::Card(3))).await;
        assert_eq!(target, Some(CardTarget::Card(3)));
        assert_eq!(draft.card_id().await, Some(3));
    }

    #[tokio::test]
    async fn test_cached_id_of_other_type_is_ignored() {
        let draft = Draft::new(MemoryStore::new());
        draft.set_id_for(CardType::Personal, 10).await;

        let nav = WizardNav {
            card_type: Some(CardType::Team),
            ..Default::default()
        };
        assert_eq!(resolve_target(&draft, &nav, None).await, None);
    }

    #[tokio::test]
    async fn test_card_type_defaults_to_personal() {
        let draft = Draft::new(MemoryStore::new());
        assert_eq!(resolve_card_type(&draft, &WizardNav::default()).await, CardType::Personal);

        draft.set_card_type(CardType::Team).await;
        assert_eq!(resolve_card_type(&draft, &WizardNav::default()).await, CardType::Team);
    }
}
