// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer token authorization against a [`CredentialStore`].
//!
//! Checks run in a fixed order and stop at the first failure:
//! 1. `Authorization: Bearer <token>` header present
//! 2. Fault-injection markers (when enabled)
//! 3. Token format (3..=100 printable ASCII, no whitespace)
//! 4. Exactly one active token row matches
//!
//! Service scoping is a separate step ([`Authorizer::require_service`]) so
//! callers can distinguish 401 from 403.

use std::sync::Arc;

use trident_config::model::FaultConfig;
use trident_core::{CallerIdentity, Credential, CredentialStore, Service, TridentError};

use crate::password::verify_password;
use crate::token::is_well_formed;

const BEARER_PREFIX: &str = "Bearer ";

const MISSING_TOKEN: &str = "Invalid or missing API token";
const QUOTA_EXCEEDED: &str = "Billing quota exceeded";
const UNAVAILABLE: &str = "Service temporarily unavailable";
const INVALID_ACCESS_TOKEN: &str = "Invalid access token";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Validates bearer tokens and operator logins.
#[derive(Clone)]
pub struct Authorizer {
    store: Arc<dyn CredentialStore>,
    faults: FaultConfig,
}

impl Authorizer {
    pub fn new(store: Arc<dyn CredentialStore>, faults: FaultConfig) -> Self {
        Self { store, faults }
    }

    /// Map a raw `Authorization` header value onto a caller identity.
    ///
    /// Has no side effects on the store.
    pub async fn authorize(&self, header: Option<&str>) -> Result<CallerIdentity, TridentError> {
        let token = header
            .and_then(|h| h.strip_prefix(BEARER_PREFIX))
            .ok_or_else(|| TridentError::Unauthenticated(MISSING_TOKEN.into()))?;

        self.check_fault_markers(token)?;

        if !is_well_formed(token) {
            return Err(TridentError::Unauthenticated(MISSING_TOKEN.into()));
        }

        let mut rows = self.store.find_active_tokens(token).await?;
        if rows.len() != 1 {
            if rows.len() > 1 {
                tracing::warn!(matches = rows.len(), "ambiguous token lookup rejected");
            }
            return Err(TridentError::Unauthenticated(MISSING_TOKEN.into()));
        }
        let row = rows.remove(0);

        tracing::debug!(scope_id = row.workspace_id, token_id = row.id, "caller authorized");
        Ok(CallerIdentity {
            scope_id: row.workspace_id,
            token: row.token,
            service: row.service,
        })
    }

    /// Reject identities whose token is scoped to a different service.
    pub fn require_service(
        &self,
        identity: &CallerIdentity,
        service: Service,
    ) -> Result<(), TridentError> {
        if identity.permits(service) {
            Ok(())
        } else {
            Err(TridentError::Forbidden(format!(
                "token is not valid for {}",
                service.display_name()
            )))
        }
    }

    /// [`authorize`](Self::authorize) followed by [`require_service`](Self::require_service).
    pub async fn authorize_for(
        &self,
        header: Option<&str>,
        service: Service,
    ) -> Result<CallerIdentity, TridentError> {
        let identity = self.authorize(header).await?;
        self.require_service(&identity, service)?;
        Ok(identity)
    }

    /// Check a bare token value for use with `service`.
    ///
    /// Used by the client-side token prompt; every failure is `Forbidden`.
    pub async fn validate_token(&self, service: Service, token: &str) -> Result<(), TridentError> {
        let forbidden = || TridentError::Forbidden(INVALID_ACCESS_TOKEN.into());
        if !is_well_formed(token) {
            return Err(forbidden());
        }
        let rows = self.store.find_active_tokens(token).await?;
        match rows.as_slice() {
            [row] if row.service.is_none_or(|scoped| scoped == service) => Ok(()),
            _ => Err(forbidden()),
        }
    }

    /// Verify an operator's username and password.
    pub async fn login(&self, username: &str, password: &str) -> Result<Credential, TridentError> {
        let credential = self
            .store
            .find_credential(username)
            .await?
            .ok_or_else(|| TridentError::Unauthenticated(INVALID_CREDENTIALS.into()))?;

        if verify_password(password, &credential.password_hash)? {
            tracing::info!(username = %credential.username, "operator logged in");
            Ok(credential)
        } else {
            Err(TridentError::Unauthenticated(INVALID_CREDENTIALS.into()))
        }
    }

    fn check_fault_markers(&self, token: &str) -> Result<(), TridentError> {
        if !self.faults.enabled {
            return Ok(());
        }
        if token.contains(&self.faults.forbidden_marker) {
            return Err(TridentError::Forbidden(QUOTA_EXCEEDED.into()));
        }
        if token.contains(&self.faults.unavailable_marker) {
            return Err(TridentError::ServiceUnavailable(UNAVAILABLE.into()));
        }
        Ok(())
    }
}
