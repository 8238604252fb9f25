use dioxus::prelude::*;

use ui::pages::{
    CardEditorPage, ContactsPage, LoginPage, MyCardsPage, PublicCardPage, PublicMemberPage,
    SignupPage, TeamPage, VerifyEmailPage,
};
use ui::{
    use_auth, AuthProvider, CardTypeStep, ColorRole, ColorStep, InfoStep, LogoStep, Navbar,
    PreviewStep, TemplateStep, WizardProvider,
};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/login")]
        Login {},
        #[route("/signup")]
        Signup {},
        #[route("/verify-email?:token")]
        VerifyEmail { token: String },
        #[route("/cards")]
        MyCards {},
        #[route("/cards/:id")]
        CardEditor { id: i64 },
        #[route("/teams/:id")]
        Team { id: i64 },
        #[route("/contacts")]
        Contacts {},
        #[route("/c/:id")]
        PublicCard { id: i64 },
        #[route("/t/:team_id/m/:member_id")]
        PublicMember { team_id: i64, member_id: i64 },
        #[nest("/create")]
            #[layout(WizardLayout)]
                #[route("/")]
                CreateStart {},
                #[route("/type")]
                CardType {},
                #[route("/info")]
                Info {},
                #[route("/logo")]
                Logo {},
                #[route("/primary-color")]
                PrimaryColor {},
                #[route("/secondary-color")]
                SecondaryColor {},
                #[route("/template")]
                Template {},
                #[route("/preview")]
                Preview {},
            #[end_layout]
        #[end_nest]
        #[route("/:..segments")]
        NotFound { segments: Vec<String> },
}

fn main() {
    #[cfg(feature = "server")]
    {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                eprintln!("Failed to start tokio runtime: {e}");
                std::process::exit(1);
            }
        };
        if let Err(e) = runtime.block_on(launch_server()) {
            tracing::error!("Server exited: {:#}", e);
            std::process::exit(1);
        }
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

/// API routes first, then the server-rendered app for everything else.
#[cfg(feature = "server")]
async fn launch_server() -> anyhow::Result<()> {
    use dioxus::server::{DioxusRouterExt, ServeConfig};

    dotenvy::dotenv().ok();
    server::init_tracing();

    let memory = std::env::args().any(|arg| arg == "--memory");
    let settings = server::Settings::new()?;
    let router = server::build_router(settings, memory)
        .await?
        .serve_dioxus_application(ServeConfig::new(), App);

    // Use the address from dx serve or default to localhost:8080
    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    server::serve(router, &addr.to_string()).await
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "CardForge" }
        document::Link { rel: "stylesheet", href: ui::APP_CSS }

        AuthProvider {
            Router::<Route> {}
        }
    }
}

#[component]
fn Shell() -> Element {
    rsx! {
        Navbar {}
        main {
            class: "app-main",
            Outlet::<Route> {}
        }
    }
}

/// Signed-in users land on their cards.
#[component]
fn Home() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    use_effect(move || {
        if auth().signed_in() {
            nav.replace(Route::MyCards {});
        }
    });

    if auth().loading {
        return rsx! { p { class: "view-page", "Loading..." } };
    }

    rsx! {
        div {
            class: "view-page max-w-xl mx-auto w-full text-center",
            h1 { class: "view-title", "CardForge" }
            p {
                class: "text-neutral-600",
                "Design a digital business card, share it with a QR code and keep the cards people give you."
            }
            div {
                class: "flex justify-center gap-2 mt-6",
                Link { class: "btn btn-primary", to: Route::Signup {}, "Create an account" }
                Link { class: "btn", to: Route::Login {}, "Sign in" }
            }
        }
    }
}

#[component]
fn Login() -> Element {
    rsx! { LoginPage {} }
}

#[component]
fn Signup() -> Element {
    rsx! { SignupPage {} }
}

#[component]
fn VerifyEmail(token: String) -> Element {
    let token = Some(token).filter(|t| !t.is_empty());
    rsx! { VerifyEmailPage { token } }
}

#[component]
fn MyCards() -> Element {
    rsx! { MyCardsPage {} }
}

#[component]
fn CardEditor(id: i64) -> Element {
    rsx! { CardEditorPage { id } }
}

#[component]
fn Team(id: i64) -> Element {
    rsx! { TeamPage { id } }
}

#[component]
fn Contacts() -> Element {
    rsx! { ContactsPage {} }
}

#[component]
fn PublicCard(id: i64) -> Element {
    rsx! { PublicCardPage { id } }
}

#[component]
fn PublicMember(team_id: i64, member_id: i64) -> Element {
    rsx! { PublicMemberPage { team_id, member_id } }
}

/// Keeps one wizard payload alive while the user moves between steps.
#[component]
fn WizardLayout() -> Element {
    rsx! {
        WizardProvider {
            Outlet::<Route> {}
        }
    }
}

#[component]
fn CreateStart() -> Element {
    let nav = use_navigator();
    use_effect(move || {
        nav.replace(Route::CardType {});
    });
    rsx! {}
}

#[component]
fn CardType() -> Element {
    rsx! { CardTypeStep {} }
}

#[component]
fn Info() -> Element {
    rsx! { InfoStep {} }
}

#[component]
fn Logo() -> Element {
    rsx! { LogoStep {} }
}

// Separate route components so the color picker remounts between the two steps.
#[component]
fn PrimaryColor() -> Element {
    rsx! { ColorStep { role: ColorRole::Primary } }
}

#[component]
fn SecondaryColor() -> Element {
    rsx! { ColorStep { role: ColorRole::Secondary } }
}

#[component]
fn Template() -> Element {
    rsx! { TemplateStep {} }
}

#[component]
fn Preview() -> Element {
    rsx! { PreviewStep {} }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div {
            class: "view-page",
            h1 { class: "view-title", "Page not found" }
            p { class: "text-neutral-600", "Nothing lives at /{path}." }
            Link { class: "btn", to: Route::Home {}, "Go home" }
        }
    }
}
