/// Relay API - HTTP trigger surface for storage-change notifications
///
/// Receives `(filename, bytes)` blob notifications over HTTP, runs the
/// analyze-extract-publish pipeline, and reports the outcome. Retry and
/// at-least-once delivery stay with the notifying platform.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use formrelay::{handle_document, AppConfig, DocIntelClient, HandlerError, QueueClient};

#[derive(Clone)]
struct AppState {
    analyzer: DocIntelClient,
    queue: QueueClient,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let analyzer = DocIntelClient::new(config.docintel.clone());

    // Connect to the record queue
    let queue = QueueClient::connect(config.queue.clone())
        .await
        .expect("Failed to connect to queue server");

    // Create application state
    let state = Arc::new(AppState { analyzer, queue });

    // Build router
    let app = Router::new()
        .route("/blobs/:name", post(notify_blob))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Run server
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("Invalid PORT");

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Relay API listening on {}", addr);
    tracing::info!(
        "Analysis model: {}, queue: {}",
        config.docintel.model,
        config.queue.queue_name
    );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Process one blob notification: analyze the document, publish the record
async fn notify_blob(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<RelayResponse>), AppError> {
    if body.is_empty() {
        return Err(AppError::ValidationError("Empty request body".to_string()));
    }

    let published = handle_document(&name, &body, &state.analyzer, &state.queue)
        .await
        .map_err(|e| match e {
            HandlerError::Analysis(e) => AppError::UpstreamError(e.to_string()),
            HandlerError::Publish(e) => AppError::InternalError(e.to_string()),
        })?;

    let status = if published.is_some() {
        RelayStatus::Published
    } else {
        // Record could not be serialized; logged and dropped by the handler
        RelayStatus::Dropped
    };

    Ok((
        StatusCode::ACCEPTED,
        Json(RelayResponse {
            filename: name,
            status,
            timestamp: Utc::now(),
        }),
    ))
}

/// Health check endpoint (liveness)
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "relay-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check endpoint - verifies queue connection
async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if state.queue.is_connected() {
        Ok(Json(serde_json::json!({
            "status": "ready",
            "service": "relay-api",
            "queue": "connected"
        })))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

// Error handling

#[derive(Debug)]
enum AppError {
    ValidationError(String),
    UpstreamError(String),
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UpstreamError(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({
            "error": message
        }))).into_response()
    }
}

// Response types

/// Outcome reported to the notifying platform
#[derive(Debug, serde::Serialize)]
struct RelayResponse {
    filename: String,
    status: RelayStatus,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "lowercase")]
enum RelayStatus {
    Published, // Record sent to the queue
    Dropped,   // Record could not be serialized; logged, not published
}
