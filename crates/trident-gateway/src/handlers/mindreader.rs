// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MindReader: stateless object recognition over an uploaded frame.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;

use trident_core::TridentError;

use crate::dto::AnalysisResponse;
use crate::error::ApiError;
use crate::state::GatewayState;

const IMAGE_FIELD: &str = "image";

fn no_image() -> ApiError {
    ApiError(TridentError::invalid_field(IMAGE_FIELD, "No image uploaded"))
}

/// POST /api/mindreader/analyze
///
/// Expects a multipart body with a non-empty `image` file part.
pub async fn analyze(
    State(state): State<GatewayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "analyze without multipart body");
        no_image()
    })?;

    let mut image_len = 0usize;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError(TridentError::invalid_field(IMAGE_FIELD, e.body_text()))
    })? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError(TridentError::invalid_field(IMAGE_FIELD, e.body_text())))?;
        image_len = bytes.len();
        break;
    }
    if image_len == 0 {
        return Err(no_image());
    }

    tokio::time::sleep(state.analysis_delay()).await;
    let result = state
        .content
        .detect_objects(state.vision.frame_width, state.vision.frame_height);

    tracing::debug!(bytes = image_len, objects = result.object_count, "image analyzed");
    Ok(Json(result.into()))
}
