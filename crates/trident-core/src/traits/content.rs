// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pluggable placeholder content for the mock services.

use crate::types::{ImageJob, RecognitionResult};

/// Produces the placeholder payloads the mock services hand back.
pub trait ContentProvider: Send + Sync + 'static {
    /// Full text of the next assistant reply.
    fn chat_reply(&self) -> String;

    /// Image reference attached to a completed job.
    fn image_url(&self, job: &ImageJob) -> String;

    /// Detections for an uploaded frame of the given size.
    fn detect_objects(&self, frame_width: f64, frame_height: f64) -> RecognitionResult;
}
