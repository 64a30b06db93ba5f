// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared state for axum request handlers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use trident_auth::Authorizer;
use trident_config::model::{ChatConfig, VisionConfig};
use trident_core::{ContentProvider, JobLedger};
use trident_scheduler::JobScheduler;

/// Everything a handler may touch.
#[derive(Clone)]
pub struct GatewayState {
    pub ledger: Arc<dyn JobLedger>,
    pub authorizer: Authorizer,
    pub scheduler: JobScheduler,
    pub content: Arc<dyn ContentProvider>,
    /// Welcome message seeded into new conversations.
    pub welcome_message: Arc<str>,
    pub vision: Arc<VisionConfig>,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(
        ledger: Arc<dyn JobLedger>,
        authorizer: Authorizer,
        scheduler: JobScheduler,
        content: Arc<dyn ContentProvider>,
        chat: &ChatConfig,
        vision: VisionConfig,
    ) -> Self {
        Self {
            ledger,
            authorizer,
            scheduler,
            content,
            welcome_message: Arc::from(chat.welcome_message.as_str()),
            vision: Arc::new(vision),
            start_time: Instant::now(),
        }
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.vision.analysis_delay_ms)
    }
}
