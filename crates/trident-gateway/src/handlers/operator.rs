// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator login and token pre-validation used by the client shell.

use std::str::FromStr;

use axum::extract::State;
use axum::Json;

use trident_core::{Service, TridentError};

use crate::dto::{LoginRequest, LoginResponse, SuccessResponse, ValidateTokenRequest};
use crate::error::{ApiError, ApiJson};
use crate::state::GatewayState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<GatewayState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = body
        .username
        .filter(|u| !u.is_empty())
        .ok_or_else(|| TridentError::invalid_field("username", "username is required"))?;
    let password = body
        .password
        .ok_or_else(|| TridentError::invalid_field("password", "password is required"))?;

    let credential = state.authorizer.login(&username, &password).await?;
    Ok(Json(LoginResponse {
        success: true,
        username: credential.username,
    }))
}

/// POST /api/auth/validate-token
///
/// Unknown services and malformed tokens are answered like invalid tokens.
pub async fn validate_token(
    State(state): State<GatewayState>,
    ApiJson(body): ApiJson<ValidateTokenRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let invalid = || ApiError(TridentError::Forbidden("Invalid access token".into()));

    let service = body
        .service
        .as_deref()
        .and_then(|s| Service::from_str(s).ok())
        .ok_or_else(invalid)?;
    let token = body.token.ok_or_else(invalid)?;

    state.authorizer.validate_token(service, &token).await?;
    Ok(Json(SuccessResponse { success: true }))
}
