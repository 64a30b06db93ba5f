// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image job queries.

use rusqlite::{params, OptionalExtension, TransactionBehavior};
use trident_core::{ImageJob, ImageJobPatch, RecordId, TridentError};

use crate::database::{map_tr_err, now_timestamp, parse_column, Database};

const JOB_COLUMNS: &str = "id, token, prompt, status, progress, image_url, created_at";

fn row_to_job(row: &rusqlite::Row<'_>) -> rusqlite::Result<ImageJob> {
    Ok(ImageJob {
        id: row.get(0)?,
        token: row.get(1)?,
        prompt: row.get(2)?,
        status: parse_column(3, row.get(3)?)?,
        progress: row.get(4)?,
        image_url: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Insert a job in `pending` with zero progress.
pub async fn insert_image_job(
    db: &Database,
    owner: &str,
    prompt: &str,
) -> Result<ImageJob, TridentError> {
    let owner = owner.to_string();
    let prompt = prompt.to_string();
    let created_at = now_timestamp();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!(
                    "INSERT INTO image_jobs (token, prompt, status, progress, created_at)
                     VALUES (?1, ?2, 'pending', 0, ?3)
                     RETURNING {JOB_COLUMNS}"
                ),
                params![owner, prompt, created_at],
                row_to_job,
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Get an image job by id.
pub async fn get_image_job(db: &Database, id: RecordId) -> Result<Option<ImageJob>, TridentError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {JOB_COLUMNS} FROM image_jobs WHERE id = ?1"),
                params![id],
                row_to_job,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Merge `patch` into the stored job.
///
/// Read, validation, and write happen inside one IMMEDIATE transaction so a
/// concurrent writer can never observe or produce a half-applied patch.
pub async fn update_image_job(
    db: &Database,
    id: RecordId,
    patch: ImageJobPatch,
) -> Result<ImageJob, TridentError> {
    db.connection()
        .call(
            move |conn| -> Result<Result<ImageJob, TridentError>, rusqlite::Error> {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                let current = tx
                    .query_row(
                        &format!("SELECT {JOB_COLUMNS} FROM image_jobs WHERE id = ?1"),
                        params![id],
                        row_to_job,
                    )
                    .optional()?;
                let Some(current) = current else {
                    return Ok(Err(TridentError::not_found("image job", id)));
                };
                let next = match current.apply(&patch) {
                    Ok(next) => next,
                    Err(e) => return Ok(Err(e)),
                };
                tx.execute(
                    "UPDATE image_jobs SET status = ?1, progress = ?2, image_url = ?3
                     WHERE id = ?4",
                    params![next.status.to_string(), next.progress, next.image_url, id],
                )?;
                tx.commit()?;
                Ok(Ok(next))
            },
        )
        .await
        .map_err(map_tr_err)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;
    use trident_core::ImageJobStatus;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("jobs.db").to_str().unwrap())
            .await
            .unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn new_job_is_pending_and_readable() {
        let (db, _dir) = setup_db().await;
        let job = insert_image_job(&db, "tk_owner", "a lighthouse at dusk")
            .await
            .unwrap();
        assert_eq!(job.status, ImageJobStatus::Pending);
        assert_eq!(job.progress, 0);
        assert!(job.image_url.is_none());

        let fetched = get_image_job(&db, job.id).await.unwrap().unwrap();
        assert_eq!(fetched, job);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn full_lifecycle_then_terminal() {
        let (db, _dir) = setup_db().await;
        let job = insert_image_job(&db, "tk_owner", "cat").await.unwrap();

        let job = update_image_job(
            &db,
            job.id,
            ImageJobPatch {
                status: Some(ImageJobStatus::Processing),
                progress: Some(10),
                image_url: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(job.status, ImageJobStatus::Processing);

        let done = update_image_job(
            &db,
            job.id,
            ImageJobPatch {
                status: Some(ImageJobStatus::Completed),
                progress: Some(100),
                image_url: Some("https://img/1".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(done.image_url.as_deref(), Some("https://img/1"));

        let err = update_image_job(
            &db,
            job.id,
            ImageJobPatch {
                status: Some(ImageJobStatus::Failed),
                ..ImageJobPatch::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TridentError::TerminalState { .. }));

        let stored = get_image_job(&db, job.id).await.unwrap().unwrap();
        assert_eq!(stored, done);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn rejected_patch_leaves_row_untouched() {
        let (db, _dir) = setup_db().await;
        let job = insert_image_job(&db, "tk_owner", "dog").await.unwrap();
        update_image_job(
            &db,
            job.id,
            ImageJobPatch {
                status: Some(ImageJobStatus::Processing),
                progress: Some(50),
                image_url: None,
            },
        )
        .await
        .unwrap();

        let err = update_image_job(
            &db,
            job.id,
            ImageJobPatch {
                progress: Some(20),
                ..ImageJobPatch::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TridentError::InvalidInput { .. }));

        let stored = get_image_job(&db, job.id).await.unwrap().unwrap();
        assert_eq!(stored.progress, 50);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_unknown_job_is_not_found() {
        let (db, _dir) = setup_db().await;
        let err = update_image_job(&db, 77, ImageJobPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TridentError::NotFound { entity: "image job", .. }));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_progress_updates_never_decrease() {
        let (db, _dir) = setup_db().await;
        let db = Arc::new(db);
        let job = insert_image_job(&db, "tk_owner", "race").await.unwrap();

        let mut handles = Vec::new();
        for progress in (10..=90).step_by(10) {
            let db = Arc::clone(&db);
            handles.push(tokio::spawn(async move {
                update_image_job(
                    &db,
                    job.id,
                    ImageJobPatch {
                        status: Some(ImageJobStatus::Processing),
                        progress: Some(progress),
                        image_url: None,
                    },
                )
                .await
            }));
        }
        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                accepted += 1;
            }
        }
        assert!(accepted >= 1);

        let stored = get_image_job(&db, job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ImageJobStatus::Processing);
        assert!(stored.progress >= 10 && stored.progress <= 90);
    }
}
