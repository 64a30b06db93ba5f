// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access token queries. Rows are never deleted.

use rusqlite::params;
use trident_core::{AccessToken, Service, TridentError};

use crate::database::{map_tr_err, now_timestamp, Database};

const TOKEN_COLUMNS: &str =
    "id, name, token, workspace_id, service, created_at, updated_at, revoked_at";

fn row_to_token(row: &rusqlite::Row<'_>) -> rusqlite::Result<AccessToken> {
    let service: Option<String> = row.get(4)?;
    let service = service
        .map(|raw| crate::database::parse_column::<Service>(4, raw))
        .transpose()?;
    Ok(AccessToken {
        id: row.get(0)?,
        name: row.get(1)?,
        token: row.get(2)?,
        workspace_id: row.get(3)?,
        service,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
        revoked_at: row.get(7)?,
    })
}

/// Store a newly issued token.
pub async fn insert_token(
    db: &Database,
    name: &str,
    token: &str,
    workspace_id: i64,
    service: Option<Service>,
) -> Result<AccessToken, TridentError> {
    let name = name.to_string();
    let token = token.to_string();
    let service = service.map(|s| s.to_string());
    let now = now_timestamp();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!(
                    "INSERT INTO api_tokens (name, token, workspace_id, service, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                     RETURNING {TOKEN_COLUMNS}"
                ),
                params![name, token, workspace_id, service, now],
                row_to_token,
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Every non-revoked row whose value equals `token` byte-for-byte.
pub async fn find_active_tokens(
    db: &Database,
    token: &str,
) -> Result<Vec<AccessToken>, TridentError> {
    let token = token.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<AccessToken>, rusqlite::Error> {
            // `=` on TEXT uses the BINARY collation: exact and case-sensitive.
            let mut stmt = conn.prepare(&format!(
                "SELECT {TOKEN_COLUMNS} FROM api_tokens
                 WHERE token = ?1 AND revoked_at IS NULL"
            ))?;
            let rows = stmt.query_map(params![token], row_to_token)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Mark a token revoked. Returns false when no active row matched.
pub async fn revoke_token(db: &Database, token: &str) -> Result<bool, TridentError> {
    let token = token.to_string();
    let now = now_timestamp();
    let changed = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE api_tokens SET revoked_at = ?1, updated_at = ?1
                 WHERE token = ?2 AND revoked_at IS NULL",
                params![now, token],
            )
        })
        .await
        .map_err(map_tr_err)?;
    Ok(changed > 0)
}

/// All token rows, revoked included, oldest first.
pub async fn list_tokens(db: &Database) -> Result<Vec<AccessToken>, TridentError> {
    db.connection()
        .call(|conn| -> Result<Vec<AccessToken>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TOKEN_COLUMNS} FROM api_tokens ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map([], row_to_token)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("tokens.db").to_str().unwrap())
            .await
            .unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn issued_token_is_active() {
        let (db, _dir) = setup_db().await;
        let issued = insert_token(&db, "ci", "tk_abc", 3, Some(Service::DreamWeaver))
            .await
            .unwrap();
        assert!(issued.is_active());
        assert_eq!(issued.service, Some(Service::DreamWeaver));

        let found = find_active_tokens(&db, "tk_abc").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].workspace_id, 3);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn lookup_is_exact_and_case_sensitive() {
        let (db, _dir) = setup_db().await;
        insert_token(&db, "ci", "tk_Abc", 1, None).await.unwrap();

        assert!(find_active_tokens(&db, "tk_abc").await.unwrap().is_empty());
        assert!(find_active_tokens(&db, "tk_Ab").await.unwrap().is_empty());
        assert!(find_active_tokens(&db, "tk_Abc ").await.unwrap().is_empty());
        assert_eq!(find_active_tokens(&db, "tk_Abc").await.unwrap().len(), 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn revoked_token_is_not_found_but_kept() {
        let (db, _dir) = setup_db().await;
        insert_token(&db, "ci", "tk_gone", 1, None).await.unwrap();

        assert!(revoke_token(&db, "tk_gone").await.unwrap());
        assert!(!revoke_token(&db, "tk_gone").await.unwrap());
        assert!(find_active_tokens(&db, "tk_gone").await.unwrap().is_empty());

        let all = list_tokens(&db).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].revoked_at.is_some());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_token_value_is_rejected() {
        let (db, _dir) = setup_db().await;
        insert_token(&db, "a", "tk_dup", 1, None).await.unwrap();
        let err = insert_token(&db, "b", "tk_dup", 2, None).await.unwrap_err();
        assert!(matches!(err, TridentError::Storage { .. }));
        db.close().await.unwrap();
    }
}
