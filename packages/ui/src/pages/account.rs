//! Sign-in, sign-up and email verification pages.

use api::{LoginRequest, SignupRequest};
use dioxus::prelude::*;

use crate::auth::{sign_in, use_auth};
use crate::card_form::describe;
use crate::links;
use crate::storage::sleep_secs;

/// Seconds between verification status polls.
const VERIFY_POLL_SECS: u64 = 5;

#[component]
fn FormError(message: Option<String>) -> Element {
    rsx! {
        if let Some(err) = message {
            div {
                class: "px-2.5 py-2.5 bg-red-50 border border-red-200 rounded text-red-600 text-[0.8125rem]",
                "{err}"
            }
        }
    }
}

#[component]
pub fn LoginPage() -> Element {
    let auth = use_auth();
    let navigator = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    // Already signed in
    use_effect(move || {
        if !auth().loading && auth().signed_in() {
            navigator.replace(links::MY_CARDS);
        }
    });

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() {
            return;
        }
        spawn(async move {
            error.set(None);
            let e = email().trim().to_string();
            if e.is_empty() || password().is_empty() {
                error.set(Some("Please enter your email and password".to_string()));
                return;
            }

            loading.set(true);
            let request = LoginRequest {
                email: e,
                password: password(),
            };
            match auth().client().login(&request).await {
                Ok(response) => {
                    sign_in(auth, response).await;
                    navigator.push(links::MY_CARDS);
                }
                Err(e) => {
                    loading.set(false);
                    error.set(Some(describe(&e)));
                }
            }
        });
    };

    rsx! {
        div {
            class: "flex flex-col items-center justify-center min-h-screen p-8",

            h1 { class: "mb-2 font-bold text-[1.75rem]", "Sign in" }
            p { class: "mb-8 text-neutral-600", "Welcome back to CardForge" }

            form {
                onsubmit: handle_login,
                class: "flex flex-col gap-3 w-full max-w-[320px]",

                FormError { message: error() }

                input {
                    class: "input",
                    r#type: "email",
                    placeholder: "Email",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }
                input {
                    class: "input",
                    r#type: "password",
                    placeholder: "Password",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Signing in..." } else { "Sign in" }
                }
            }

            p {
                class: "mt-6 text-sm text-neutral-600",
                "No account yet? "
                Link { to: links::SIGNUP, "Sign up" }
            }
        }
    }
}

#[component]
pub fn SignupPage() -> Element {
    let auth = use_auth();
    let navigator = use_navigator();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_signup = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() {
            return;
        }
        spawn(async move {
            error.set(None);

            let n = name().trim().to_string();
            let e = email().trim().to_string();
            let p = password();

            if n.is_empty() {
                error.set(Some("Name is required".to_string()));
                return;
            }
            if e.is_empty() || !e.contains('@') {
                error.set(Some("Please enter a valid email".to_string()));
                return;
            }
            if p.chars().count() < 8 {
                error.set(Some("Password must be at least 8 characters".to_string()));
                return;
            }
            if p != confirm_password() {
                error.set(Some("Passwords do not match".to_string()));
                return;
            }

            loading.set(true);
            let request = SignupRequest {
                name: n,
                email: e,
                password: p,
            };
            match auth().client().signup(&request).await {
                Ok(response) => {
                    sign_in(auth, response).await;
                    navigator.push(links::VERIFY_EMAIL);
                }
                Err(e) => {
                    loading.set(false);
                    error.set(Some(describe(&e)));
                }
            }
        });
    };

    rsx! {
        div {
            class: "flex flex-col items-center justify-center min-h-screen p-8",

            h1 { class: "mb-2 font-bold text-[1.75rem]", "Create Account" }
            p { class: "mb-8 text-neutral-600", "Sign up for CardForge" }

            form {
                onsubmit: handle_signup,
                class: "flex flex-col gap-3 w-full max-w-[320px]",

                FormError { message: error() }

                input {
                    class: "input",
                    r#type: "text",
                    placeholder: "Name",
                    value: name(),
                    oninput: move |evt: FormEvent| name.set(evt.value()),
                }
                input {
                    class: "input",
                    r#type: "email",
                    placeholder: "Email",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }
                input {
                    class: "input",
                    r#type: "password",
                    placeholder: "Password (min 8 characters)",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
                input {
                    class: "input",
                    r#type: "password",
                    placeholder: "Confirm password",
                    value: confirm_password(),
                    oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Creating account..." } else { "Sign up" }
                }
            }

            p {
                class: "mt-6 text-sm text-neutral-600",
                "Already have an account? "
                Link { to: links::LOGIN, "Sign in" }
            }
        }
    }
}

/// With a `token` (the link from the verification email) the address is
/// confirmed right away. Without one, the page polls the signed-in user's
/// status until another tab has followed the link.
#[component]
pub fn VerifyEmailPage(token: Option<String>) -> Element {
    let mut auth = use_auth();
    let navigator = use_navigator();
    let mut verified = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let _ = use_resource(move || {
        let token = token.clone();
        async move {
            let token = token.filter(|t| !t.is_empty());
            // Only the polling branch needs to wait for the session to load.
            let client = if token.is_some() {
                auth.peek().client()
            } else {
                auth().client()
            };
            if let Some(token) = token {
                match client.verify_email(&token).await {
                    Ok(status) => verified.set(status.verified),
                    Err(e) => error.set(Some(describe(&e))),
                }
                return;
            }

            if client.token().is_none() {
                return;
            }
            loop {
                match client.verification_status().await {
                    Ok(status) if status.verified => {
                        verified.set(true);
                        break;
                    }
                    Ok(_) => {}
                    Err(e) if e.is_unauthorized() => break,
                    Err(e) => tracing::debug!("Verification status poll failed: {}", e),
                }
                sleep_secs(VERIFY_POLL_SECS).await;
            }
        }
    });

    // Reflect the new status in the signed-in user
    use_effect(move || {
        if verified() {
            let mut state = auth.peek().clone();
            if let Some(user) = state.user.as_mut() {
                if !user.email_verified {
                    user.email_verified = true;
                    auth.set(state);
                }
            }
        }
    });

    rsx! {
        div {
            class: "flex flex-col items-center justify-center min-h-screen p-8 text-center",

            if verified() {
                h1 { class: "mb-2 font-bold text-[1.75rem]", "Email verified" }
                p { class: "mb-6 text-neutral-600", "Your address is confirmed." }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| {
                        navigator.push("/create/type");
                    },
                    "Create your first card"
                }
            } else if let Some(err) = error() {
                h1 { class: "mb-2 font-bold text-[1.75rem]", "Verification failed" }
                p { class: "text-red-600", "{err}" }
            } else {
                h1 { class: "mb-2 font-bold text-[1.75rem]", "Check your inbox" }
                p {
                    class: "mb-6 text-neutral-600",
                    "We sent you a verification link. This page updates once it has been opened."
                }
                Link { to: links::MY_CARDS, "Continue without verifying" }
            }
        }
    }
}
