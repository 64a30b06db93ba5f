// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic content provider for assertions on exact payloads.

use trident_core::types::{BoundingBox, DetectedObject};
use trident_core::{ContentProvider, ImageJob, RecognitionResult};

/// Reply text used when none is configured.
pub const DEFAULT_REPLY: &str = "I can certainly help with that.";

/// Always answers with the same reply, url pattern, and single detection.
#[derive(Debug, Clone)]
pub struct FixedContent {
    reply: String,
}

impl FixedContent {
    pub fn new() -> Self {
        Self::with_reply(DEFAULT_REPLY)
    }

    pub fn with_reply(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
        }
    }
}

impl Default for FixedContent {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentProvider for FixedContent {
    fn chat_reply(&self) -> String {
        self.reply.clone()
    }

    fn image_url(&self, job: &ImageJob) -> String {
        format!("https://images.test/{}.png", job.id)
    }

    fn detect_objects(&self, _frame_width: f64, _frame_height: f64) -> RecognitionResult {
        RecognitionResult {
            object_count: 1,
            objects: vec![DetectedObject {
                label: "Cat".to_string(),
                score: 0.9,
                bbox: BoundingBox {
                    x: 10.0,
                    y: 20.0,
                    width: 60.0,
                    height: 70.0,
                },
            }],
        }
    }
}
