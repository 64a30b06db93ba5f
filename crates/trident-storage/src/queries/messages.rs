// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message queries.
//!
//! Updates are conditional on `is_complete = 0` so a finished message can
//! never be rewritten, even by a late scheduler tick.

use rusqlite::{params, OptionalExtension};
use trident_core::{Message, MessageRole, RecordId, TridentError};

use crate::database::{map_tr_err, now_timestamp, parse_column, Database};

const MESSAGE_COLUMNS: &str = "id, conversation_id, role, content, is_complete, created_at";

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        role: parse_column(2, row.get(2)?)?,
        content: row.get(3)?,
        is_complete: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Append a message to a conversation.
///
/// Fails with `NotFound` when the conversation does not exist.
pub async fn insert_message(
    db: &Database,
    conversation_id: RecordId,
    role: MessageRole,
    content: &str,
    complete: bool,
) -> Result<Message, TridentError> {
    let content = content.to_string();
    let role = role.to_string();
    let created_at = now_timestamp();
    let inserted = db
        .connection()
        .call(move |conn| {
            let exists: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM conversations WHERE id = ?1",
                    params![conversation_id],
                    |row| row.get(0),
                )
                .optional()?;
            if exists.is_none() {
                return Ok(None);
            }
            conn.query_row(
                &format!(
                    "INSERT INTO messages (conversation_id, role, content, is_complete, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     RETURNING {MESSAGE_COLUMNS}"
                ),
                params![conversation_id, role, content, complete, created_at],
                row_to_message,
            )
            .map(Some)
        })
        .await
        .map_err(map_tr_err)?;

    inserted.ok_or_else(|| TridentError::not_found("conversation", conversation_id))
}

/// Replace content and completion flag of a message that is not yet complete.
pub async fn update_message(
    db: &Database,
    id: RecordId,
    content: &str,
    complete: bool,
) -> Result<Message, TridentError> {
    let content = content.to_string();
    let (updated, exists) = db
        .connection()
        .call(move |conn| -> Result<_, rusqlite::Error> {
            let updated = conn
                .query_row(
                    &format!(
                        "UPDATE messages SET content = ?1, is_complete = ?2
                         WHERE id = ?3 AND is_complete = 0
                         RETURNING {MESSAGE_COLUMNS}"
                    ),
                    params![content, complete, id],
                    row_to_message,
                )
                .optional()?;
            if updated.is_some() {
                return Ok((updated, true));
            }
            let exists = conn
                .query_row("SELECT 1 FROM messages WHERE id = ?1", params![id], |_| Ok(()))
                .optional()?
                .is_some();
            Ok((None, exists))
        })
        .await
        .map_err(map_tr_err)?;

    match (updated, exists) {
        (Some(message), _) => Ok(message),
        (None, true) => Err(TridentError::TerminalState {
            entity: "message",
            id,
        }),
        (None, false) => Err(TridentError::not_found("message", id)),
    }
}

/// Messages of a conversation in creation order (ties broken by id).
pub async fn list_messages(
    db: &Database,
    conversation_id: RecordId,
) -> Result<Vec<Message>, TridentError> {
    db.connection()
        .call(move |conn| -> Result<Vec<Message>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE conversation_id = ?1
                 ORDER BY created_at ASC, id ASC"
            ))?;
            let rows = stmt.query_map(params![conversation_id], row_to_message)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::conversations::create_conversation;
    use tempfile::tempdir;

    async fn setup_db_with_conversation() -> (Database, RecordId, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db").to_str().unwrap())
            .await
            .unwrap();
        let conversation = create_conversation(&db, "tk_owner").await.unwrap();
        (db, conversation.id, dir)
    }

    #[tokio::test]
    async fn insert_and_list_in_call_order() {
        let (db, cid, _dir) = setup_db_with_conversation().await;

        insert_message(&db, cid, MessageRole::Assistant, "welcome", true)
            .await
            .unwrap();
        insert_message(&db, cid, MessageRole::User, "hello", true)
            .await
            .unwrap();
        let placeholder = insert_message(&db, cid, MessageRole::Assistant, "", false)
            .await
            .unwrap();
        assert!(!placeholder.is_complete);

        let messages = list_messages(&db, cid).await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["welcome", "hello", ""]);
        assert_eq!(messages[1].role, MessageRole::User);
        assert!(messages.windows(2).all(|w| w[0].created_at <= w[1].created_at));

        // Idempotent read.
        assert_eq!(list_messages(&db, cid).await.unwrap(), messages);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn insert_into_unknown_conversation_is_not_found() {
        let (db, _cid, _dir) = setup_db_with_conversation().await;
        let err = insert_message(&db, 999, MessageRole::User, "hi", true)
            .await
            .unwrap_err();
        assert!(matches!(err, TridentError::NotFound { entity: "conversation", .. }));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_unknown_conversation_is_empty() {
        let (db, _cid, _dir) = setup_db_with_conversation().await;
        assert!(list_messages(&db, 999).await.unwrap().is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_fills_placeholder_until_complete() {
        let (db, cid, _dir) = setup_db_with_conversation().await;
        let placeholder = insert_message(&db, cid, MessageRole::Assistant, "", false)
            .await
            .unwrap();

        let partial = update_message(&db, placeholder.id, "Hel", false).await.unwrap();
        assert_eq!(partial.content, "Hel");
        assert!(!partial.is_complete);

        let done = update_message(&db, placeholder.id, "Hello", true).await.unwrap();
        assert!(done.is_complete);
        assert_eq!(done.created_at, placeholder.created_at);

        let err = update_message(&db, placeholder.id, "rewritten", true)
            .await
            .unwrap_err();
        assert!(matches!(err, TridentError::TerminalState { entity: "message", .. }));

        let stored = list_messages(&db, cid).await.unwrap();
        assert_eq!(stored[0].content, "Hello");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_unknown_message_is_not_found() {
        let (db, _cid, _dir) = setup_db_with_conversation().await;
        let err = update_message(&db, 12345, "x", true).await.unwrap_err();
        assert!(matches!(err, TridentError::NotFound { entity: "message", .. }));
        db.close().await.unwrap();
    }
}
