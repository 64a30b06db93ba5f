// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image job progression.
//!
//! Each tick adds `step` percentage points. The job turns `processing` on
//! the first advance and `completed` (with its image url) in the same write
//! that reaches 100. An injected failure, or cancellation, marks the job
//! `failed` with progress frozen. So do repeated ledger write failures.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use trident_core::{
    ContentProvider, ImageJob, ImageJobPatch, ImageJobStatus, JobLedger, RecordId, TridentError,
};

/// Consecutive failed ticks after which a job is given up on.
pub const MAX_FAILED_TICKS: u32 = 3;

/// Parameters for one image job task.
#[derive(Debug, Clone)]
pub struct ImageProgress {
    pub step: u8,
    pub interval: Duration,
    pub failure_probability: f64,
}

/// The patch for the tick that follows `progress`.
pub fn next_patch(
    job: &ImageJob,
    progress: u8,
    step: u8,
    content: &dyn ContentProvider,
) -> ImageJobPatch {
    let next = progress.saturating_add(step).min(100);
    if next == 100 {
        let mut done = job.clone();
        done.progress = 100;
        ImageJobPatch {
            status: Some(ImageJobStatus::Completed),
            progress: Some(100),
            image_url: Some(content.image_url(&done)),
        }
    } else {
        ImageJobPatch {
            status: Some(ImageJobStatus::Processing),
            progress: Some(next),
            image_url: None,
        }
    }
}

/// Drive a pending job to a terminal state.
pub async fn run_image_job(
    ledger: Arc<dyn JobLedger>,
    content: Arc<dyn ContentProvider>,
    job: ImageJob,
    params: ImageProgress,
    cancel: CancellationToken,
) {
    let id = job.id;
    let mut progress = job.progress;
    let mut failed_ticks = 0;

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                debug!(job_id = id, progress, "image job cancelled");
                mark_failed(ledger.as_ref(), id).await;
                return;
            }
            () = tokio::time::sleep(params.interval) => {}
        }

        if roll_failure(params.failure_probability) {
            debug!(job_id = id, progress, "injected image job failure");
            mark_failed(ledger.as_ref(), id).await;
            return;
        }

        let patch = next_patch(&job, progress, params.step, content.as_ref());
        match ledger.update_image_job(id, patch).await {
            Ok(updated) => {
                failed_ticks = 0;
                progress = updated.progress;
                debug!(job_id = id, progress, status = %updated.status, "image job advanced");
                if updated.status.is_terminal() {
                    return;
                }
            }
            Err(TridentError::NotFound { .. } | TridentError::TerminalState { .. }) => {
                debug!(job_id = id, "image job gone or finished elsewhere, stopping");
                return;
            }
            Err(e) => {
                warn!(job_id = id, progress, error = %e, "image job tick failed");
                failed_ticks += 1;
                if failed_ticks >= MAX_FAILED_TICKS {
                    warn!(
                        job_id = id,
                        failed_ticks,
                        "image job abandoned after repeated write failures"
                    );
                    mark_failed(ledger.as_ref(), id).await;
                    return;
                }
            }
        }
    }
}

fn roll_failure(probability: f64) -> bool {
    probability > 0.0 && rand::thread_rng().gen_bool(probability.min(1.0))
}

async fn mark_failed(ledger: &dyn JobLedger, id: RecordId) {
    let patch = ImageJobPatch {
        status: Some(ImageJobStatus::Failed),
        ..ImageJobPatch::default()
    };
    match ledger.update_image_job(id, patch).await {
        Ok(_) | Err(TridentError::NotFound { .. } | TridentError::TerminalState { .. }) => {}
        Err(e) => warn!(job_id = id, error = %e, "failed to mark image job failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trident_config::model::{ImageConfig, VisionConfig};

    use crate::content::RandomContent;

    fn job() -> ImageJob {
        ImageJob {
            id: 9,
            token: "tk".into(),
            prompt: "p".into(),
            status: ImageJobStatus::Pending,
            progress: 0,
            image_url: None,
            created_at: String::new(),
        }
    }

    fn content() -> RandomContent {
        RandomContent::new(&ImageConfig::default(), &VisionConfig::default())
    }

    #[test]
    fn failure_roll_extremes() {
        assert!(!roll_failure(0.0));
        assert!(roll_failure(1.0));
    }

    #[test]
    fn intermediate_ticks_are_processing_without_url() {
        let patch = next_patch(&job(), 0, 10, &content());
        assert_eq!(patch.status, Some(ImageJobStatus::Processing));
        assert_eq!(patch.progress, Some(10));
        assert!(patch.image_url.is_none());
    }

    #[test]
    fn final_tick_completes_with_url() {
        let patch = next_patch(&job(), 90, 10, &content());
        assert_eq!(patch.status, Some(ImageJobStatus::Completed));
        assert_eq!(patch.progress, Some(100));
        assert_eq!(
            patch.image_url.as_deref(),
            Some("https://picsum.photos/seed/9/1024/1024")
        );
    }

    #[test]
    fn progress_clamps_at_100() {
        let patch = next_patch(&job(), 95, 30, &content());
        assert_eq!(patch.progress, Some(100));
        let patch = next_patch(&job(), 250, 30, &content());
        assert_eq!(patch.progress, Some(100));
    }

    #[test]
    fn every_generated_patch_is_accepted_by_the_job_rules() {
        let mut current = job();
        for _ in 0..20 {
            if current.status.is_terminal() {
                break;
            }
            let patch = next_patch(&current, current.progress, 7, &content());
            current = current.apply(&patch).unwrap();
        }
        assert_eq!(current.status, ImageJobStatus::Completed);
        assert_eq!(current.progress, 100);
    }
}
