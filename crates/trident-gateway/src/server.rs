// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use trident_config::model::ServerConfig;
use trident_core::{Service, TridentError};

use crate::auth::{require_token, ServiceGuard};
use crate::handlers;
use crate::state::GatewayState;

/// Build the full application router.
///
/// Public routes:
/// - GET /api/services
/// - POST /api/auth/login
/// - POST /api/auth/validate-token
/// - GET /health
///
/// Each service group sits behind its own [`ServiceGuard`].
pub fn build_router(state: GatewayState) -> Router {
    let guard = |service| {
        axum_middleware::from_fn_with_state(
            ServiceGuard {
                authorizer: state.authorizer.clone(),
                service,
            },
            require_token,
        )
    };

    let public_routes = Router::new()
        .route("/api/services", get(handlers::services::list_services))
        .route("/api/auth/login", post(handlers::operator::login))
        .route("/api/auth/validate-token", post(handlers::operator::validate_token))
        .route("/health", get(handlers::health::get_health));

    let chatterblast_routes = Router::new()
        .route(
            "/api/chatterblast/conversation",
            post(handlers::chatterblast::create_conversation),
        )
        .route("/api/chatterblast/chat", post(handlers::chatterblast::send_message))
        .route(
            "/api/chatterblast/conversation/{id}/messages",
            get(handlers::chatterblast::list_messages),
        )
        .route_layer(guard(Service::ChatterBlast));

    let dreamweaver_routes = Router::new()
        .route("/api/dreamweaver/generate", post(handlers::dreamweaver::generate))
        .route("/api/dreamweaver/jobs/{id}", get(handlers::dreamweaver::get_job))
        .route_layer(guard(Service::DreamWeaver));

    let mindreader_routes = Router::new()
        .route("/api/mindreader/analyze", post(handlers::mindreader::analyze))
        .layer(DefaultBodyLimit::max(state.vision.max_upload_bytes))
        .route_layer(guard(Service::MindReader));

    Router::new()
        .merge(public_routes)
        .merge(chatterblast_routes)
        .merge(dreamweaver_routes)
        .merge(mindreader_routes)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve the gateway until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), TridentError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TridentError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| TridentError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
