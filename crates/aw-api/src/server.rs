//! API server implementation.

use axum::{middleware, Router};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[allow(unused_imports)]
use crate::dto::*;
use crate::error::ErrorResponse;
use crate::middleware::{request_id, request_logging};
use crate::routes;
use crate::state::AppState;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Socket address to listen on.
    pub bind_address: SocketAddr,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Serve Swagger UI at `/swagger-ui`.
    pub enable_swagger: bool,
    /// Grace period for in-flight requests on shutdown.
    pub shutdown_timeout: Duration,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            request_timeout: Duration::from_secs(30),
            enable_swagger: true,
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl ApiServerConfig {
    /// Reads configuration from the environment (`AW_BIND_ADDRESS`,
    /// `AW_ENABLE_SWAGGER`), falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("AW_BIND_ADDRESS") {
            if let Ok(parsed) = addr.parse() {
                config.bind_address = parsed;
            }
        }
        if let Ok(enabled) = std::env::var("AW_ENABLE_SWAGGER") {
            config.enable_swagger = enabled != "0" && enabled.to_lowercase() != "false";
        }
        config
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::health::readiness_check,
        crate::routes::health::liveness_check,
        crate::routes::assets::create_asset,
        crate::routes::assets::queue,
        crate::routes::assets::get_asset,
        crate::routes::assets::audit_trail,
        crate::routes::assets::review,
        crate::routes::assets::claim,
        crate::routes::assets::release,
        crate::routes::assets::submit,
        crate::routes::assets::archive,
        crate::routes::assets::restore,
        crate::routes::assets::bulk_approve,
        crate::routes::assets::bulk_reject,
        crate::routes::reviewers::list_reviewers,
    ),
    components(
        schemas(
            HealthResponse,
            DatabaseHealth,
            CreateAssetRequest,
            AssetResponse,
            AssetDetailResponse,
            UserSummaryResponse,
            QueueQuery,
            QueueItemResponse,
            QueuePageResponse,
            StatusCountsResponse,
            ReviewRequest,
            ReviewResponse,
            ReviewOutcomeResponse,
            BulkApproveRequest,
            BulkRejectRequest,
            BulkActionResponse,
            TrailQuery,
            AuditEntryResponse,
            TrailResponse,
            ReviewerResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Assets", description = "Asset lifecycle and dispositions"),
        (name = "Audit", description = "Immutable audit trail"),
        (name = "Reviewers", description = "Reviewer directory"),
    ),
    info(
        title = "Asset Warden API",
        version = "0.1.0",
        description = "Role-gated asset governance with an immutable audit trail",
        license(name = "Apache-2.0"),
    )
)]
pub struct ApiDoc;

/// The HTTP server: router assembly plus the serve loop.
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(state: AppState, config: ApiServerConfig) -> Self {
        Self { config, state }
    }

    pub fn with_state(state: AppState) -> Self {
        Self::new(state, ApiServerConfig::default())
    }

    /// Assembles the full router with middleware layers applied.
    pub fn router(&self) -> Router {
        let mut app = routes::create_router(self.state.clone());

        if self.config.enable_swagger {
            app = app.merge(
                SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
            );
        }

        app.layer(middleware::from_fn(request_logging))
            .layer(middleware::from_fn(request_id))
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(self.config.request_timeout))
            .layer(CatchPanicLayer::new())
    }

    /// Serves until Ctrl+C or SIGTERM, then drains in-flight requests.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let addr = self.config.bind_address;
        let app = self.router();

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "Listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

/// Resolves when a termination signal arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Ctrl+C handler installation failed");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation failed")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }
}
