mod backend;
mod config;
mod errors;
mod export;
mod form;
mod models;
mod notify;
mod persistence;
mod render;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backend::http::HttpBackend;
use crate::config::Config;
use crate::persistence::reconciler::SessionIdentity;
use crate::persistence::store::FileStore;
use crate::routes::build_router;
use crate::session::Session;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume builder v{}", env!("CARGO_PKG_VERSION"));

    let backend = HttpBackend::new(config.backend_url.clone())
        .context("Failed to build the backend HTTP client")?;
    info!("Backend client initialized ({})", config.backend_url);

    let store = FileStore::open(&config.cache_dir)
        .with_context(|| format!("Failed to open cache dir {}", config.cache_dir.display()))?;

    let identity = SessionIdentity::new(config.session_owner.clone());
    let session = Session::new(
        Arc::new(backend),
        Arc::new(store),
        identity,
        config.download_dir.clone(),
        config.save_debounce,
    );

    let outcome = session.load().await;
    info!(?outcome, "Startup load complete");

    let _ticker = session.spawn_autosave_ticker(config.autosave_interval);

    let state = AppState {
        config: config.clone(),
        session,
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("127.0.0.1:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
