//! Health check endpoints.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::dto::{DatabaseHealth, HealthResponse};
use crate::state::AppState;

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = "Health"
)]
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match &state.db {
        Some(db) => DatabaseHealth {
            connected: db.is_healthy().await,
            pool_size: db.pool_size(),
            idle_connections: db.idle_connections(),
        },
        // Mock-backed state has no pool to probe.
        None => DatabaseHealth {
            connected: true,
            pool_size: 0,
            idle_connections: 0,
        },
    };

    let (status, http_status) = if database.connected {
        ("healthy", StatusCode::OK)
    } else {
        ("unhealthy", StatusCode::SERVICE_UNAVAILABLE)
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database,
        }),
    )
}

/// Kubernetes readiness probe.
#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    ),
    tag = "Health"
)]
async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    let ready = match &state.db {
        Some(db) => db.is_healthy().await,
        None => true,
    };
    if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Kubernetes liveness probe.
#[utoipa::path(
    get,
    path = "/live",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = "Health"
)]
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}
