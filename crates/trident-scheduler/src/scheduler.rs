// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job scheduler: spawns and tracks the background tasks that advance
//! chat replies and image jobs.
//!
//! Every task runs under a per-record [`CancellationToken`] that is a child
//! of the process-wide shutdown token, and is spawned on a [`TaskTracker`]
//! so shutdown can wait for in-flight writes to land.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use trident_config::model::{ChatConfig, ImageConfig, SchedulerConfig};
use trident_core::{ContentProvider, ImageJob, JobLedger, Message, RecordId, TridentError};

use crate::chat::{run_chat_reply, ChatReply};
use crate::image::{run_image_job, ImageProgress};

/// Identifies a running task by the record it drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKey {
    ChatReply(RecordId),
    ImageJob(RecordId),
}

/// Owns the time-stepped progression of in-flight work.
#[derive(Clone)]
pub struct JobScheduler {
    ledger: Arc<dyn JobLedger>,
    content: Arc<dyn ContentProvider>,
    chat: ChatConfig,
    image: ImageConfig,
    max_in_flight: usize,
    shutdown: CancellationToken,
    tracker: TaskTracker,
    running: Arc<DashMap<JobKey, RunningJob>>,
    generation: Arc<AtomicU64>,
}

struct RunningJob {
    generation: u64,
    cancel: CancellationToken,
}

impl JobScheduler {
    pub fn new(
        ledger: Arc<dyn JobLedger>,
        content: Arc<dyn ContentProvider>,
        chat: ChatConfig,
        image: ImageConfig,
        scheduler: &SchedulerConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            ledger,
            content,
            chat,
            image,
            max_in_flight: scheduler.max_in_flight,
            shutdown,
            tracker: TaskTracker::new(),
            running: Arc::new(DashMap::new()),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of tasks currently running.
    pub fn in_flight(&self) -> usize {
        self.running.len()
    }

    /// Whether a task for `key` is currently running.
    pub fn is_running(&self, key: JobKey) -> bool {
        self.running.contains_key(&key)
    }

    /// Refuse new work when at capacity or shutting down.
    ///
    /// Call before persisting anything for the new job. The limit is soft:
    /// concurrent requests may each pass this check before either spawns.
    pub fn ensure_capacity(&self) -> Result<(), TridentError> {
        if self.shutdown.is_cancelled() {
            return Err(TridentError::ServiceUnavailable(
                "server is shutting down".into(),
            ));
        }
        let in_flight = self.in_flight();
        if in_flight >= self.max_in_flight {
            warn!(in_flight, limit = self.max_in_flight, "scheduler at capacity");
            return Err(TridentError::ServiceUnavailable(
                "Service temporarily unavailable".into(),
            ));
        }
        Ok(())
    }

    /// Start filling an assistant placeholder with a reply from the content provider.
    pub fn spawn_chat_reply(&self, placeholder: &Message) {
        let job = ChatReply {
            message_id: placeholder.id,
            reply: self.content.chat_reply(),
            steps: self.chat.steps,
            interval: Duration::from_millis(self.chat.step_interval_ms),
        };
        let ledger = Arc::clone(&self.ledger);
        self.spawn(JobKey::ChatReply(placeholder.id), move |cancel| {
            run_chat_reply(ledger, job, cancel)
        });
    }

    /// Start advancing a freshly created image job.
    pub fn spawn_image_job(&self, job: &ImageJob) {
        let params = ImageProgress {
            step: self.image.step,
            interval: Duration::from_millis(self.image.tick_interval_ms),
            failure_probability: self.image.failure_probability,
        };
        let ledger = Arc::clone(&self.ledger);
        let content = Arc::clone(&self.content);
        let job = job.clone();
        self.spawn(JobKey::ImageJob(job.id), move |cancel| {
            run_image_job(ledger, content, job, params, cancel)
        });
    }

    /// Cancel one running task. Returns false if nothing was running for `key`.
    pub fn cancel(&self, key: JobKey) -> bool {
        match self.running.get(&key) {
            Some(entry) => {
                entry.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every task and wait up to `grace` for them to flush.
    pub async fn shutdown(&self, grace: Duration) -> Result<(), TridentError> {
        let pending = self.in_flight();
        info!(pending, "stopping scheduler");
        self.shutdown.cancel();
        self.tracker.close();
        match tokio::time::timeout(grace, self.tracker.wait()).await {
            Ok(()) => {
                info!("scheduler drained");
                Ok(())
            }
            Err(_) => {
                warn!(remaining = self.in_flight(), "scheduler drain timed out");
                Err(TridentError::Timeout { duration: grace })
            }
        }
    }

    fn spawn<F, Fut>(&self, key: JobKey, task: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let cancel = self.shutdown.child_token();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let entry = RunningJob {
            generation,
            cancel: cancel.clone(),
        };
        if let Some(previous) = self.running.insert(key, entry) {
            // A record is only ever driven by one task.
            warn!(?key, "replacing running task");
            previous.cancel.cancel();
        }
        let running = Arc::clone(&self.running);
        let fut = task(cancel);
        self.tracker.spawn(async move {
            debug!(?key, "job started");
            fut.await;
            running.remove_if(&key, |_, entry| entry.generation == generation);
            debug!(?key, "job finished");
        });
    }
}
