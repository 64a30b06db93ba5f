// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication middleware for the service routes.
//!
//! Each service route group is layered with its own [`ServiceGuard`]. On
//! success the caller's [`CallerIdentity`] is placed in the request
//! extensions for handlers to extract.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use trident_auth::Authorizer;
use trident_core::{CallerIdentity, Service};

use crate::error::ApiError;

/// Middleware state binding an authorizer to the service being guarded.
#[derive(Clone)]
pub struct ServiceGuard {
    pub authorizer: Authorizer,
    pub service: Service,
}

impl std::fmt::Debug for ServiceGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceGuard")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

/// Reject the request unless it carries a bearer token valid for the guarded service.
pub async fn require_token(
    State(guard): State<ServiceGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let identity: CallerIdentity = guard
        .authorizer
        .authorize_for(header.as_deref(), guard.service)
        .await?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
