// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the JobLedger and CredentialStore traits.

use std::path::Path;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use trident_config::model::StorageConfig;
use trident_core::{
    AccessToken, AdapterType, Conversation, Credential, CredentialStore, HealthStatus, ImageJob,
    ImageJobPatch, JobLedger, Message, MessageRole, PluginAdapter, RecordId, Service,
    TridentError,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed ledger and credential store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened by [`initialize`](Self::initialize).
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`](Self::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database, creating its parent directory if needed, and run migrations.
    pub async fn initialize(&self) -> Result<(), TridentError> {
        let path = self.config.database_path.clone();
        if let Some(parent) = Path::new(&path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| TridentError::Storage {
                source: Box::new(e),
            })?;
        }
        let db = Database::open_with(&path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| TridentError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Returns the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, TridentError> {
        self.db.get().ok_or_else(|| TridentError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    // --- Operator administration (CLI only) ---

    /// Persist a freshly generated token value.
    pub async fn issue_token(
        &self,
        name: &str,
        token: &str,
        workspace_id: i64,
        service: Option<Service>,
    ) -> Result<AccessToken, TridentError> {
        queries::tokens::insert_token(self.db()?, name, token, workspace_id, service).await
    }

    /// Revoke a token by value. Returns false if it was unknown or already revoked.
    pub async fn revoke_token(&self, token: &str) -> Result<bool, TridentError> {
        queries::tokens::revoke_token(self.db()?, token).await
    }

    pub async fn list_tokens(&self) -> Result<Vec<AccessToken>, TridentError> {
        queries::tokens::list_tokens(self.db()?).await
    }

    /// Create an operator account from an already hashed password.
    pub async fn add_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Credential, TridentError> {
        queries::credentials::insert_user(self.db()?, username, password_hash).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TridentError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".into()));
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TridentError> {
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(crate::database::map_tr_err)?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl JobLedger for SqliteStorage {
    // --- Conversations ---

    async fn create_conversation(&self, owner: &str) -> Result<Conversation, TridentError> {
        queries::conversations::create_conversation(self.db()?, owner).await
    }

    async fn get_conversation(&self, id: RecordId) -> Result<Option<Conversation>, TridentError> {
        queries::conversations::get_conversation(self.db()?, id).await
    }

    // --- Messages ---

    async fn append_message(
        &self,
        conversation_id: RecordId,
        role: MessageRole,
        content: &str,
        complete: bool,
    ) -> Result<Message, TridentError> {
        queries::messages::insert_message(self.db()?, conversation_id, role, content, complete)
            .await
    }

    async fn update_message(
        &self,
        id: RecordId,
        content: &str,
        complete: bool,
    ) -> Result<Message, TridentError> {
        queries::messages::update_message(self.db()?, id, content, complete).await
    }

    async fn list_messages(&self, conversation_id: RecordId) -> Result<Vec<Message>, TridentError> {
        queries::messages::list_messages(self.db()?, conversation_id).await
    }

    // --- Image jobs ---

    async fn create_image_job(&self, owner: &str, prompt: &str) -> Result<ImageJob, TridentError> {
        queries::image_jobs::insert_image_job(self.db()?, owner, prompt).await
    }

    async fn get_image_job(&self, id: RecordId) -> Result<Option<ImageJob>, TridentError> {
        queries::image_jobs::get_image_job(self.db()?, id).await
    }

    async fn update_image_job(
        &self,
        id: RecordId,
        patch: ImageJobPatch,
    ) -> Result<ImageJob, TridentError> {
        queries::image_jobs::update_image_job(self.db()?, id, patch).await
    }
}

#[async_trait]
impl CredentialStore for SqliteStorage {
    async fn find_active_tokens(&self, token: &str) -> Result<Vec<AccessToken>, TridentError> {
        queries::tokens::find_active_tokens(self.db()?, token).await
    }

    async fn find_credential(&self, username: &str) -> Result<Option<Credential>, TridentError> {
        queries::credentials::find_user(self.db()?, username).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_creates_nested_database_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("dir").join("init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
        storage.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn double_initialize_fails() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn operations_before_initialize_fail() {
        let storage = SqliteStorage::new(make_config("/nonexistent/never.db"));
        assert!(storage.create_conversation("tk_x").await.is_err());
        assert!(matches!(
            storage.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }

    #[tokio::test]
    async fn ledger_and_credentials_through_traits() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("traits.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let ledger: &dyn JobLedger = &storage;
        let conversation = ledger.create_conversation("tk_owner").await.unwrap();
        ledger
            .append_message(conversation.id, MessageRole::Assistant, "hi", true)
            .await
            .unwrap();
        assert_eq!(ledger.list_messages(conversation.id).await.unwrap().len(), 1);

        storage
            .issue_token("default", "tk_owner", 1, None)
            .await
            .unwrap();
        let store: &dyn CredentialStore = &storage;
        assert_eq!(store.find_active_tokens("tk_owner").await.unwrap().len(), 1);

        assert!(storage.revoke_token("tk_owner").await.unwrap());
        assert!(store.find_active_tokens("tk_owner").await.unwrap().is_empty());
        assert_eq!(storage.list_tokens().await.unwrap().len(), 1);

        storage.add_user("admin", "$argon2id$stub").await.unwrap();
        assert!(store.find_credential("admin").await.unwrap().is_some());
    }
}
