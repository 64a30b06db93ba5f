// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential store trait: the single source of truth for token validity.

use async_trait::async_trait;

use crate::error::TridentError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{AccessToken, Credential};

/// Read-mostly store of operator credentials and access tokens.
#[async_trait]
pub trait CredentialStore: PluginAdapter {
    /// Returns every non-revoked token row whose value equals `token` exactly.
    ///
    /// Comparison is case-sensitive. Callers decide how to treat multiple rows.
    async fn find_active_tokens(&self, token: &str) -> Result<Vec<AccessToken>, TridentError>;

    /// Looks up an operator credential by username.
    async fn find_credential(&self, username: &str) -> Result<Option<Credential>, TridentError>;
}
