// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator account queries.

use rusqlite::{params, OptionalExtension};
use trident_core::{Credential, TridentError};

use crate::database::{map_tr_err, now_timestamp, Database};

fn row_to_credential(row: &rusqlite::Row<'_>) -> rusqlite::Result<Credential> {
    Ok(Credential {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Insert an operator account. `password_hash` must already be a PHC string.
pub async fn insert_user(
    db: &Database,
    username: &str,
    password_hash: &str,
) -> Result<Credential, TridentError> {
    let username = username.to_string();
    let password_hash = password_hash.to_string();
    let now = now_timestamp();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "INSERT INTO users (username, password, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)
                 RETURNING id, username, password, created_at",
                params![username, password_hash, now],
                row_to_credential,
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Look up an operator account by username.
pub async fn find_user(db: &Database, username: &str) -> Result<Option<Credential>, TridentError> {
    let username = username.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, username, password, created_at FROM users WHERE username = ?1",
                params![username],
                row_to_credential,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn insert_then_find() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("users.db").to_str().unwrap())
            .await
            .unwrap();

        let created = insert_user(&db, "admin", "$argon2id$v=19$stub").await.unwrap();
        let found = find_user(&db, "admin").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.password_hash, "$argon2id$v=19$stub");

        assert!(find_user(&db, "Admin").await.unwrap().is_none());
        assert!(insert_user(&db, "admin", "x").await.is_err());
        db.close().await.unwrap();
    }
}
