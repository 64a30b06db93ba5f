// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation queries.

use rusqlite::{params, OptionalExtension};
use trident_core::{Conversation, RecordId, TridentError};

use crate::database::{map_tr_err, now_timestamp, Database};

fn row_to_conversation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: row.get(0)?,
        token: row.get(1)?,
        created_at: row.get(2)?,
    })
}

/// Insert a conversation and return the stored row.
pub async fn create_conversation(db: &Database, owner: &str) -> Result<Conversation, TridentError> {
    let owner = owner.to_string();
    let created_at = now_timestamp();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "INSERT INTO conversations (token, created_at) VALUES (?1, ?2)
                 RETURNING id, token, created_at",
                params![owner, created_at],
                row_to_conversation,
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Get a conversation by id.
pub async fn get_conversation(
    db: &Database,
    id: RecordId,
) -> Result<Option<Conversation>, TridentError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, token, created_at FROM conversations WHERE id = ?1",
                params![id],
                row_to_conversation,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}
