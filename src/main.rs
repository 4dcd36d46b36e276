//! Smart Ping Backend
//!
//! A REST backend for a team update feed with SQLite persistence and AI-generated digests.

mod api;
mod completion;
mod config;
mod db;
mod errors;
mod models;
mod services;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use completion::{CompletionClient, OpenRouterClient};
use config::{Config, LogFormat};
use db::Repository;
use services::{SharedClock, SummaryService, UpdateService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub updates: Arc<UpdateService>,
    pub summaries: Arc<SummaryService>,
}

impl AppState {
    /// Wire the services around one repository, completion client and clock.
    pub fn new(
        repo: Arc<Repository>,
        completion: Arc<dyn CompletionClient>,
        clock: SharedClock,
        model: impl Into<String>,
    ) -> Self {
        Self {
            updates: Arc::new(UpdateService::new(repo.clone(), clock.clone())),
            summaries: Arc::new(SummaryService::new(repo, completion, clock, model)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }

    tracing::info!("Starting Smart Ping Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Summaries fail until a key is provided; everything else still works
    if config.completion.api_key.is_none() {
        tracing::warn!("No completion API key configured (OPENROUTER_API_KEY). Summaries will fail!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Completion client is built once and injected
    let completion = Arc::new(OpenRouterClient::new(&config.completion)?);
    tracing::info!(
        "Completion endpoint: {} (model {})",
        completion.endpoint(),
        config.completion.model
    );

    let state = AppState::new(
        repo,
        completion,
        Arc::new(mockable::DefaultClock),
        config.completion.model.clone(),
    );

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Updates
        .route("/updates", get(api::list_updates).post(api::create_update))
        .route("/updates/search", get(api::search_updates))
        .route(
            "/updates/{id}",
            get(api::get_update)
                .put(api::edit_update)
                .delete(api::delete_update),
        )
        // Summary
        .route("/summary", get(api::get_summary));

    // Probes
    let probe_routes = Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(probe_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Root banner.
async fn banner() -> &'static str {
    "Smart Ping API is running"
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
