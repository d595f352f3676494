//! HTTP route handlers.

use std::sync::Arc;

use axum::middleware;
use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::agents::{build_registry, AgentRegistry, Envelope};
use crate::config::Config;
use crate::logging::TracingSink;
use crate::types::{Input, Output};
use crate::version::{version_info, VersionInfo};

use super::auth;
use super::types::{ApiError, HealthResponse};
use super::validation::ValidInput;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Agents reachable over HTTP, each wrapped once at start-up
    pub registry: AgentRegistry,
    pub version: &'static VersionInfo,
}

impl AppState {
    pub fn new(config: Config, registry: AgentRegistry) -> Self {
        Self {
            config,
            registry,
            version: version_info(),
        }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    let protected_routes = Router::new()
        .route("/process", post(process_default))
        .route("/agents/:name/process", post(process_named))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_api_key,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and block until shutdown.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let registry = build_registry(&config, Arc::new(TracingSink::new()));
    tracing::info!("Registered agents: {}", registry.names().join(", "));

    let addr = config.bind_addr();
    let state = Arc::new(AppState::new(config, registry));
    let app = router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        "{} v{} listening on {}",
        state.version.name,
        state.version.version,
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests");
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let agent = state
        .registry
        .default_envelope()
        .map(|e| e.agent_name().to_string())
        .unwrap_or_default();

    Json(HealthResponse {
        status: "healthy".to_string(),
        agent,
        version: state.version.version.clone(),
        build_date: state.version.build_date.clone(),
    })
}

async fn version(State(state): State<Arc<AppState>>) -> Json<VersionInfo> {
    Json(state.version.clone())
}

/// Process with the default agent.
async fn process_default(
    State(state): State<Arc<AppState>>,
    ValidInput(input): ValidInput,
) -> Result<Json<Output>, ApiError> {
    let envelope = state
        .registry
        .default_envelope()
        .ok_or_else(|| ApiError::UnknownAgent("default".to_string()))?;
    run(&envelope, input).await
}

/// Process with an agent selected by (case-insensitive) name.
async fn process_named(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    ValidInput(input): ValidInput,
) -> Result<Json<Output>, ApiError> {
    let envelope = state
        .registry
        .get(&name)
        .ok_or(ApiError::UnknownAgent(name))?;
    run(&envelope, input).await
}

async fn run(envelope: &Envelope, input: Input) -> Result<Json<Output>, ApiError> {
    match envelope.execute(&input).await {
        Ok(output) => Ok(Json(output)),
        Err(err) => {
            tracing::error!(
                "Processing error in {} (session {}): {}",
                envelope.agent_name(),
                input.session_id,
                err
            );
            Err(err.into())
        }
    }
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
