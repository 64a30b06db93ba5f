// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use axum::extract::State;
use axum::Json;

use trident_core::HealthStatus;

use crate::dto::HealthResponse;
use crate::state::GatewayState;

/// GET /health
///
/// Unauthenticated. Reports `degraded` when the ledger health check fails.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let status = match state.ledger.health_check().await {
        Ok(HealthStatus::Healthy) => "healthy",
        Ok(HealthStatus::Degraded(_)) => "degraded",
        Ok(HealthStatus::Unhealthy(reason)) => {
            tracing::warn!(%reason, "ledger unhealthy");
            "degraded"
        }
        Err(e) => {
            tracing::warn!(error = %e, "ledger health check failed");
            "degraded"
        }
    };
    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
