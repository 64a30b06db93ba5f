// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory credential store test double.
//!
//! Rows are fixed at construction. Lookups follow the same exact-match,
//! active-only rules as the SQLite store.

use async_trait::async_trait;

use trident_core::{
    AccessToken, AdapterType, Credential, CredentialStore, HealthStatus, PluginAdapter, Service,
    TridentError,
};

const FIXED_TIME: &str = "2026-01-01T00:00:00.000Z";

/// A [`CredentialStore`] backed by plain vectors.
#[derive(Debug, Default, Clone)]
pub struct StaticCredentialStore {
    tokens: Vec<AccessToken>,
    users: Vec<Credential>,
}

impl StaticCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active token.
    pub fn with_token(mut self, token: &str, workspace_id: i64, service: Option<Service>) -> Self {
        let row = self.row(token, workspace_id, service, None);
        self.tokens.push(row);
        self
    }

    /// Add a token row that has already been revoked.
    pub fn with_revoked_token(mut self, token: &str, workspace_id: i64) -> Self {
        let row = self.row(token, workspace_id, None, Some(FIXED_TIME.to_string()));
        self.tokens.push(row);
        self
    }

    /// Add an operator account. `password_hash` must be a PHC string.
    pub fn with_user(mut self, username: &str, password_hash: &str) -> Self {
        self.users.push(Credential {
            id: self.users.len() as i64 + 1,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: FIXED_TIME.to_string(),
        });
        self
    }

    fn row(
        &self,
        token: &str,
        workspace_id: i64,
        service: Option<Service>,
        revoked_at: Option<String>,
    ) -> AccessToken {
        AccessToken {
            id: self.tokens.len() as i64 + 1,
            name: format!("static-{}", self.tokens.len() + 1),
            token: token.to_string(),
            workspace_id,
            service,
            created_at: FIXED_TIME.to_string(),
            updated_at: FIXED_TIME.to_string(),
            revoked_at,
        }
    }
}

#[async_trait]
impl PluginAdapter for StaticCredentialStore {
    fn name(&self) -> &str {
        "static-credentials"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, TridentError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TridentError> {
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn find_active_tokens(&self, token: &str) -> Result<Vec<AccessToken>, TridentError> {
        Ok(self
            .tokens
            .iter()
            .filter(|row| row.token == token && row.is_active())
            .cloned()
            .collect())
    }

    async fn find_credential(&self, username: &str) -> Result<Option<Credential>, TridentError> {
        Ok(self.users.iter().find(|u| u.username == username).cloned())
    }
}
