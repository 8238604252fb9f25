mod account;
mod card_editor;
mod contacts;
mod my_cards;
mod public;
mod team;

pub use account::{LoginPage, SignupPage, VerifyEmailPage};
pub use card_editor::CardEditorPage;
pub use contacts::ContactsPage;
pub use my_cards::MyCardsPage;
pub use public::{PublicCardPage, PublicMemberPage};
pub use team::{parse_members, TeamPage};
