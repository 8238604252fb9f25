//! Authentication context and hooks for the UI.

use api::{ApiClient, AuthResponse, UserInfo};
use dioxus::prelude::*;

use crate::links;
use crate::storage::{make_client, make_session};

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<UserInfo>,
    pub token: Option<String>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            token: None,
            loading: true,
        }
    }
}

impl AuthState {
    /// API client carrying the current bearer token.
    pub fn client(&self) -> ApiClient {
        make_client(self.token.clone())
    }

    pub fn signed_in(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Record a successful signup or login in the cache and the context.
pub async fn sign_in(mut auth: Signal<AuthState>, response: AuthResponse) {
    let display_name = response.user.display_name().to_string();
    make_session()
        .sign_in(response.token.clone(), display_name)
        .await;
    auth.set(AuthState {
        user: Some(response.user),
        token: Some(response.token),
        loading: false,
    });
}

/// Provider component that manages authentication state.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let mut auth_state = use_signal(AuthState::default);

    // Restore the cached token and check it against the server on mount
    let _ = use_resource(move || async move {
        let session = make_session();
        let Some(token) = session.token().await else {
            auth_state.set(AuthState {
                loading: false,
                ..AuthState::default()
            });
            return;
        };

        match make_client(Some(token.clone())).me().await {
            Ok(user) => {
                auth_state.set(AuthState {
                    user: Some(user),
                    token: Some(token),
                    loading: false,
                });
            }
            Err(e) if e.is_unauthorized() => {
                tracing::info!("Cached token rejected, signing out");
                session.sign_out().await;
                auth_state.set(AuthState {
                    loading: false,
                    ..AuthState::default()
                });
            }
            Err(e) => {
                // Offline: keep the token so the next request can retry.
                tracing::warn!("Failed to load current user: {}", e);
                auth_state.set(AuthState {
                    user: None,
                    token: Some(token),
                    loading: false,
                });
            }
        }
    });

    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let mut auth_state = use_auth();
    let navigator = use_navigator();

    let onclick = move |_| async move {
        make_session().sign_out().await;
        auth_state.set(AuthState {
            loading: false,
            ..AuthState::default()
        });
        navigator.push(links::LOGIN);
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}

/// Shown in place of a page that needs a signed-in user.
#[component]
pub fn SignInPrompt() -> Element {
    rsx! {
        div {
            class: "notice",
            "You need to be signed in to continue. "
            Link { to: links::LOGIN, "Sign in" }
            " or "
            Link { to: links::SIGNUP, "create an account" }
            "."
        }
    }
}
