// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `trident token` and `trident user` command implementations.
//!
//! These open the same database as `serve` and are the only way tokens and
//! operator accounts are created. Token values are printed once at issue
//! time and masked everywhere else.

use trident_auth::{generate_token, hash_password};
use trident_config::TridentConfig;
use trident_core::{AccessToken, Service, TridentError};
use trident_storage::SqliteStorage;

const VISIBLE_TOKEN_CHARS: usize = 7;

async fn open_storage(config: &TridentConfig) -> Result<SqliteStorage, TridentError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    Ok(storage)
}

/// Runs `trident token issue`.
pub async fn run_token_issue(
    config: &TridentConfig,
    name: &str,
    workspace: i64,
    service: Option<Service>,
) -> Result<(), TridentError> {
    let storage = open_storage(config).await?;
    let issued = issue(&storage, name, workspace, service).await?;
    println!("{}", issued.token);
    eprintln!(
        "issued token '{}' for workspace {} ({})",
        issued.name,
        issued.workspace_id,
        scope_label(issued.service)
    );
    Ok(())
}

/// Runs `trident token revoke`.
pub async fn run_token_revoke(config: &TridentConfig, token: &str) -> Result<(), TridentError> {
    let storage = open_storage(config).await?;
    if storage.revoke_token(token).await? {
        println!("revoked {}", mask_token(token));
        Ok(())
    } else {
        Err(TridentError::not_found("token", mask_token(token)))
    }
}

/// Runs `trident token list`.
pub async fn run_token_list(config: &TridentConfig) -> Result<(), TridentError> {
    let storage = open_storage(config).await?;
    let tokens = storage.list_tokens().await?;
    if tokens.is_empty() {
        println!("no tokens issued");
        return Ok(());
    }
    println!(
        "{:<5} {:<20} {:<12} {:<10} {:<14} {}",
        "ID", "NAME", "TOKEN", "WORKSPACE", "SERVICE", "STATUS"
    );
    for row in &tokens {
        println!("{}", format_row(row));
    }
    Ok(())
}

/// Runs `trident user add`, prompting for the password twice.
pub async fn run_user_add(config: &TridentConfig, username: &str) -> Result<(), TridentError> {
    let password = rpassword::prompt_password("Password: ")
        .map_err(|e| TridentError::Internal(format!("failed to read password: {e}")))?;
    let confirm = rpassword::prompt_password("Confirm password: ")
        .map_err(|e| TridentError::Internal(format!("failed to read password: {e}")))?;
    if password != confirm {
        return Err(TridentError::invalid_field("password", "passwords do not match"));
    }

    let storage = open_storage(config).await?;
    add_user(&storage, username, &password).await?;
    println!("created operator account '{username}'");
    Ok(())
}

async fn issue(
    storage: &SqliteStorage,
    name: &str,
    workspace: i64,
    service: Option<Service>,
) -> Result<AccessToken, TridentError> {
    if name.trim().is_empty() {
        return Err(TridentError::invalid_field("name", "token name must not be empty"));
    }
    let token = generate_token();
    storage.issue_token(name, &token, workspace, service).await
}

async fn add_user(
    storage: &SqliteStorage,
    username: &str,
    password: &str,
) -> Result<(), TridentError> {
    if username.trim().is_empty() {
        return Err(TridentError::invalid_field("username", "username must not be empty"));
    }
    if password.is_empty() {
        return Err(TridentError::invalid_field("password", "password must not be empty"));
    }
    let hash = hash_password(password)?;
    storage.add_user(username, &hash).await?;
    Ok(())
}

fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(VISIBLE_TOKEN_CHARS).collect();
    format!("{visible}...")
}

fn scope_label(service: Option<Service>) -> &'static str {
    service.map_or("all services", Service::display_name)
}

fn format_row(row: &AccessToken) -> String {
    let status = if row.is_active() { "active" } else { "revoked" };
    format!(
        "{:<5} {:<20} {:<12} {:<10} {:<14} {}",
        row.id,
        row.name,
        mask_token(&row.token),
        row.workspace_id,
        scope_label(row.service),
        status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use trident_config::model::StorageConfig;
    use trident_core::CredentialStore;

    async fn temp_storage() -> (SqliteStorage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::new(StorageConfig {
            database_path: dir.path().join("admin.db").to_string_lossy().to_string(),
            wal_mode: true,
        });
        storage.initialize().await.unwrap();
        (storage, dir)
    }

    #[tokio::test]
    async fn issued_token_is_active_and_scoped() {
        let (storage, _dir) = temp_storage().await;
        let issued = issue(&storage, "ci", 3, Some(Service::MindReader)).await.unwrap();
        assert!(issued.token.starts_with("tk_"));

        let rows = storage.find_active_tokens(&issued.token).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].workspace_id, 3);
        assert_eq!(rows[0].service, Some(Service::MindReader));
    }

    #[tokio::test]
    async fn issue_rejects_blank_name() {
        let (storage, _dir) = temp_storage().await;
        let err = issue(&storage, "  ", 1, None).await.unwrap_err();
        assert!(matches!(err, TridentError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn added_user_has_hashed_password() {
        let (storage, _dir) = temp_storage().await;
        add_user(&storage, "admin", "admin123").await.unwrap();
        let credential = storage.find_credential("admin").await.unwrap().unwrap();
        assert_ne!(credential.password_hash, "admin123");
        assert!(credential.password_hash.starts_with("$argon2id$"));
        assert!(add_user(&storage, "admin", "again").await.is_err());
    }

    #[test]
    fn token_display_is_masked() {
        assert_eq!(mask_token("tk_0123456789abcdef"), "tk_0123...");
        assert_eq!(mask_token("abc"), "abc...");
    }

    #[tokio::test]
    async fn listed_rows_show_revocation() {
        let (storage, _dir) = temp_storage().await;
        let issued = issue(&storage, "temp", 1, None).await.unwrap();
        storage.revoke_token(&issued.token).await.unwrap();
        let rows = storage.list_tokens().await.unwrap();
        let line = format_row(&rows[0]);
        assert!(line.contains("revoked"));
        assert!(line.contains("all services"));
        assert!(!line.contains(&issued.token));
    }
}
