//! Paths of the app's pages, shared by components that link across crates.

use store::CardTarget;

pub const LOGIN: &str = "/login";
pub const SIGNUP: &str = "/signup";
pub const VERIFY_EMAIL: &str = "/verify-email";
pub const MY_CARDS: &str = "/cards";
pub const CONTACTS: &str = "/contacts";

pub fn card_editor(id: i64) -> String {
    format!("/cards/{id}")
}

pub fn team(id: i64) -> String {
    format!("/teams/{id}")
}

pub fn public_card(id: i64) -> String {
    format!("/c/{id}")
}

pub fn public_member(team_id: i64, member_id: i64) -> String {
    format!("/t/{team_id}/m/{member_id}")
}

/// Management page of a finished wizard run.
pub fn target(target: CardTarget) -> String {
    match target {
        CardTarget::Card(id) => card_editor(id),
        CardTarget::Team(id) => team(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths_match_qr_urls() {
        assert_eq!(public_card(5), "/c/5");
        assert_eq!(public_member(2, 9), "/t/2/m/9");
        assert_eq!(target(CardTarget::Team(3)), "/teams/3");
    }
}
