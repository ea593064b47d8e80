//! Temperature API Server
//!
//! Thin HTTP adapter over the temperature store: single and batch inserts,
//! windowed queries, health and Prometheus metrics.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::{predicate::SizeAbove, CompressionLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod routes;
pub mod telemetry;

pub use self::config::{DbConfig, LogConfig, ServerConfig, UrlConfig, DEFAULT_CONFIG_PATH};
pub use self::error::ApiError;

use data_validator::{normalize, ValidationError};
use metrics_exporter_prometheus::PrometheusHandle;
use storage::{Repository, WindowQuery};

/// Application state shared across handlers
pub struct AppState {
    /// Storage repository
    pub repository: Repository,
    /// Windowed query engine over the same repository
    pub window: WindowQuery,
    /// Prometheus handle, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(repository: Repository, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            window: WindowQuery::new(repository.clone()),
            repository,
            metrics,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: String,
    pub record_count: Option<i64>,
}

/// Create the application router, mounted under the configured base path
pub fn create_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let routes = Router::new()
        .route("/about", get(about_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/test", get(test_handler))
        .route("/add", get(routes::insert::add))
        .route("/add.json", post(routes::insert::add_json))
        .route("/query", get(routes::query::query));

    let base = config.base_path();
    let router = if base.is_empty() {
        routes
    } else {
        Router::new().nest(&base, routes)
    };

    router
        .fallback(not_found)
        .layer(CompressionLayer::new().compress_when(SizeAbove::new(config.compression_threshold)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn about_handler() -> &'static str {
    "Hello World"
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found\n")
}

/// Parameters of the timestamp check endpoint
#[derive(Debug, Deserialize)]
pub struct TestParams {
    pub time: Option<String>,
}

/// Echo the normalized epoch-seconds of `time`
async fn test_handler(Query(params): Query<TestParams>) -> Result<String, ApiError> {
    let time = params
        .time
        .filter(|t| !t.trim().is_empty())
        .ok_or(ValidationError::MissingField("time"))?;
    let seconds = normalize(&time)?;
    Ok(format!("Result:\n{}", seconds))
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let database = match state.repository.count().await {
        Ok(count) => ComponentHealth {
            status: "ok".to_string(),
            record_count: Some(count),
        },
        Err(e) => {
            error!("Health check could not reach database: {}", e);
            ComponentHealth {
                status: "error".to_string(),
                record_count: None,
            }
        }
    };

    let response = HealthResponse {
        status: if database.record_count.is_some() {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        database,
    };

    Json(response)
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::NOT_FOUND,
            "Metrics recorder not installed\n".to_string(),
        ),
    }
}

/// Initialize logging. `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}

/// Run the server until Ctrl-C
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let repository = Repository::connect(&config.db.filename).await?;
    let metrics = telemetry::install_recorder()?;

    let state = Arc::new(AppState::new(repository.clone(), Some(metrics)));
    let app = create_router(state, &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {} (base path {:?})", listener.local_addr()?, config.base_path());

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    repository.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
