use std::path::Path;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::auth::TokenKeys;
use crate::db::{MemoryRepository, PgRepository, Repository};
use crate::qr::QrFactory;
use crate::settings::Settings;
use crate::{database, routes};

/// Multipart framing on top of the image itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState<R> {
    pub repo: R,
    pub tokens: TokenKeys,
    pub qr: QrFactory,
    pub settings: Arc<Settings>,
}

impl<R: Repository> AppState<R> {
    pub fn new(repo: R, settings: Settings) -> Self {
        Self {
            repo,
            tokens: TokenKeys::new(&settings.auth.jwt_secret, settings.auth.token_ttl_hours),
            qr: QrFactory::new(settings.public_base_url()),
            settings: Arc::new(settings),
        }
    }
}

/// The `/api` router with request tracing, CORS and the upload body limit.
pub fn api_router<R: Repository>(state: AppState<R>) -> Router {
    let body_limit = state.settings.uploads.max_image_bytes + MULTIPART_OVERHEAD;
    routes::router()
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Install the fmt subscriber; `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,server=debug"));
    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Connect storage and build [`api_router`]. With `memory` set, runs on
/// [`MemoryRepository`] and needs no database.
pub async fn build_router(settings: Settings, memory: bool) -> anyhow::Result<Router> {
    if memory {
        tracing::warn!("using in-memory storage; data is lost on exit");
        Ok(api_router(AppState::new(MemoryRepository::new(), settings)))
    } else {
        let pool = database::connect(&settings.database).await?;
        Ok(api_router(AppState::new(PgRepository::new(pool), settings)))
    }
}

/// Serve the API plus the built web bundle from `server.static_dir`.
pub async fn launch(settings: Settings, memory: bool) -> anyhow::Result<()> {
    let static_dir = settings.server.static_dir.clone();
    let address = settings.server.address();

    let router = build_router(settings, memory).await?;

    let router = if Path::new(&static_dir).is_dir() {
        let index = Path::new(&static_dir).join("index.html");
        router.fallback_service(ServeDir::new(&static_dir).fallback(ServeFile::new(index)))
    } else {
        tracing::info!(static_dir = %static_dir, "no static bundle; serving API only");
        router
    };

    serve(router, &address).await
}

pub async fn serve(router: Router, address: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
