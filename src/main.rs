//! IncidentScope Backend Server
//!
//! Serves a pre-trained fatality-regression model and read-only analytics
//! over a historical incident dataset.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    INCIDENTSCOPE API                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────────┐  ┌─────────────────────┐ │
//! │  │  API      │  │  Prediction   │  │  Advisory           │ │
//! │  │  Gateway  │  │  Engine       │  │  Generator          │ │
//! │  │  (Axum)   │  │  (ONNX)       │  │  (Remote/Fallback)  │ │
//! │  └─────┬─────┘  └───────┬───────┘  └──────────┬──────────┘ │
//! │        └────────────────┼─────────────────────┘             │
//! │                         ▼                                   │
//! │              ┌─────────────────────┐                       │
//! │              │  Dataset Index      │                       │
//! │              │  (in-memory, RO)    │                       │
//! │              └─────────────────────┘                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Artifacts and the dataset are loaded exactly once at startup; either may
//! be absent, in which case the affected endpoints degrade instead of the
//! process failing to start.

mod advisory;
mod artifacts;
mod config;
mod dataset;
mod engine;
mod error;
mod handlers;
mod models;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "incidentscope_api=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("IncidentScope API starting...");
    tracing::info!("Environment: {}", config.environment);

    // One-shot startup loads; both degrade to None rather than aborting.
    let artifacts = artifacts::ArtifactBundle::load(Path::new(&config.models_dir)).map(Arc::new);
    let dataset = dataset::DatasetIndex::load(Path::new(&config.data_path)).map(Arc::new);
    let advisory = advisory::AdvisoryService::from_config(&config);

    let state = AppState {
        artifacts,
        dataset,
        advisory,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Shared application state. Artifacts and dataset are immutable after
/// startup; handlers only ever read them.
#[derive(Clone)]
pub struct AppState {
    pub artifacts: Option<Arc<artifacts::ArtifactBundle>>,
    pub dataset: Option<Arc<dataset::DatasetIndex>>,
    pub advisory: advisory::AdvisoryService,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/metadata", get(handlers::query::metadata))
        .route("/globe_data", get(handlers::query::globe_data))
        .route("/history", get(handlers::query::history))
        .route("/similar", get(handlers::query::similar))
        .route("/predict", post(handlers::predict::predict))
        .route("/genai/advisory", post(handlers::advisory::generate))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
