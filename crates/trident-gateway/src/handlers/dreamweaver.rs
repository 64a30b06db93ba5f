// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DreamWeaver: image jobs advanced by the scheduler and polled by id.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use trident_core::{CallerIdentity, RecordId, TridentError};

use crate::dto::{GenerateRequest, ImageJobResponse};
use crate::error::{ApiError, ApiJson, ApiPath};
use crate::state::GatewayState;

/// POST /api/dreamweaver/generate
pub async fn generate(
    State(state): State<GatewayState>,
    Extension(identity): Extension<CallerIdentity>,
    ApiJson(body): ApiJson<GenerateRequest>,
) -> Result<(StatusCode, Json<ImageJobResponse>), ApiError> {
    let prompt = body
        .prompt
        .filter(|p| !p.is_empty())
        .ok_or_else(|| TridentError::invalid_field("prompt", "prompt must not be empty"))?;

    state.scheduler.ensure_capacity()?;
    let job = state.ledger.create_image_job(&identity.token, &prompt).await?;
    state.scheduler.spawn_image_job(&job);

    tracing::info!(job_id = job.id, scope_id = identity.scope_id, "image job created");
    Ok((StatusCode::CREATED, Json(job.into())))
}

/// GET /api/dreamweaver/jobs/{id}
pub async fn get_job(
    State(state): State<GatewayState>,
    Extension(identity): Extension<CallerIdentity>,
    ApiPath(id): ApiPath<RecordId>,
) -> Result<Json<ImageJobResponse>, ApiError> {
    match state.ledger.get_image_job(id).await? {
        Some(job) if identity.owns(&job.token) => Ok(Json(job.into())),
        _ => Err(TridentError::not_found("image job", id).into()),
    }
}
