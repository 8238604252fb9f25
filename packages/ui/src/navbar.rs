use dioxus::prelude::*;

use crate::auth::{use_auth, LogoutButton};
use crate::links;

#[component]
pub fn Navbar() -> Element {
    let auth = use_auth();
    let display_name = auth().user.map(|u| u.display_name().to_string());

    rsx! {
        nav {
            class: "navbar",
            Link { class: "navbar-brand", to: "/", "CardForge" }
            div {
                class: "navbar-links",
                if let Some(name) = display_name {
                    Link { to: links::MY_CARDS, "My cards" }
                    Link { to: links::CONTACTS, "Contacts" }
                    Link { to: "/create/type", "New card" }
                    span { class: "navbar-user", "{name}" }
                    LogoutButton { class: "btn" }
                } else {
                    Link { to: links::LOGIN, "Sign in" }
                    Link { to: links::SIGNUP, "Sign up" }
                }
            }
        }
    }
}
