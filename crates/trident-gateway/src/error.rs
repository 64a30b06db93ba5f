// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP error mapping and rejection-normalizing extractors.
//!
//! Every error body is `{"message": ...}` with an optional `"field"`.
//! Storage and internal failures are logged and answered with a generic
//! message so no backend detail leaks to callers.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;

use trident_core::TridentError;

const INVALID_REQUEST: &str = "Invalid request";
const INTERNAL: &str = "Internal server error";

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// A [`TridentError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub TridentError);

impl From<TridentError> for ApiError {
    fn from(e: TridentError) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "rejected JSON body");
        Self(TridentError::InvalidInput {
            message: INVALID_REQUEST.to_string(),
            field: None,
        })
    }
}

impl ApiError {
    /// Status code and body for this error.
    fn parts(&self) -> (StatusCode, ErrorResponse) {
        let plain = |status, message: &str| {
            (
                status,
                ErrorResponse {
                    message: message.to_string(),
                    field: None,
                },
            )
        };
        match &self.0 {
            TridentError::Unauthenticated(m) => plain(StatusCode::UNAUTHORIZED, m),
            TridentError::Forbidden(m) => plain(StatusCode::FORBIDDEN, m),
            TridentError::ServiceUnavailable(m) => plain(StatusCode::SERVICE_UNAVAILABLE, m),
            TridentError::InvalidInput { message, field } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    message: message.clone(),
                    field: field.clone(),
                },
            ),
            TridentError::NotFound { entity, .. } => {
                plain(StatusCode::NOT_FOUND, &format!("{} not found", capitalize(entity)))
            }
            TridentError::TerminalState { entity, .. } => plain(
                StatusCode::CONFLICT,
                &format!("{} can no longer be modified", capitalize(entity)),
            ),
            TridentError::Config(_)
            | TridentError::Storage { .. }
            | TridentError::Timeout { .. }
            | TridentError::Internal(_) => plain(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.parts();
        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "request rejected");
        }
        (status, Json(body)).into_response()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `Json<T>` whose rejection is a 400 `{message}` body.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// `Path<T>` whose rejection is a 400 `{message, field: "id"}` body.
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| {
                ApiError(TridentError::invalid_field("id", rejection.body_text()))
            })?;
        Ok(Self(value))
    }
}
