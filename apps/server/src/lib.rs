pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::{Arc, Mutex};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::SqliteRepository;
use crate::services::sessions::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<Mutex<SqliteRepository>>,
    pub sessions: Arc<Mutex<SessionStore>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repository: SqliteRepository, config: Config) -> Self {
        let idle_timeout = chrono::Duration::minutes(config.session_idle_minutes);
        Self {
            repository: Arc::new(Mutex::new(repository)),
            sessions: Arc::new(Mutex::new(SessionStore::new(idle_timeout))),
            config: Arc::new(config),
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Opening database at {}", config.database_path.display());
    let repository = SqliteRepository::open(&config.database_path)?;

    tracing::info!("Loading question bank from {}", config.data_dir.display());
    services::question_bank::prepare(&repository, &config)?;

    let addr = config.addr();
    let app = build_router(AppState::new(repository, config));

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the full router, including static assets for the data directory.
pub fn build_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.data_dir);
    let asset_route = state.config.asset_route();

    let router = Router::new()
        .route("/health", get(health_check))
        // Topic routes
        .route("/api/topics", get(routes::topics::list))
        .route("/api/topics/:topic_id/count", get(routes::topics::count))
        // Quiz routes
        .route("/api/quiz/question", post(routes::quiz::question))
        .route("/api/quiz/answer", post(routes::quiz::answer))
        .route("/api/quiz/save", post(routes::quiz::save))
        // History routes
        .route("/api/history", get(routes::history::list))
        .route("/api/history/:topic_id", get(routes::history::topic));

    let router = if asset_route == "/" {
        router.fallback_service(assets)
    } else {
        router.nest_service(&asset_route, assets)
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
