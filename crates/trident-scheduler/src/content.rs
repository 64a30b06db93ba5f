// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random placeholder content used by the mock services.

use rand::Rng;
use rand::seq::SliceRandom;

use trident_config::model::{ImageConfig, VisionConfig};
use trident_core::types::{BoundingBox, DetectedObject};
use trident_core::{ContentProvider, ImageJob, RecognitionResult};

/// Canned assistant replies, picked uniformly.
pub const REPLY_TEMPLATES: [&str; 5] = [
    "That's an interesting perspective.",
    "I can certainly help with that.",
    "Could you elaborate more on that topic?",
    "Processing your request... done!",
    "Here is some information about what you asked.",
];

const MAX_OBJECTS: usize = 5;
const BOX_MARGIN: f64 = 100.0;
const BOX_MIN_SIDE: f64 = 50.0;
const BOX_SIDE_SPREAD: f64 = 100.0;
const SCORE_FLOOR: f64 = 0.8;

/// [`ContentProvider`] backed by `rand::thread_rng`.
#[derive(Debug, Clone)]
pub struct RandomContent {
    image_url_template: String,
    labels: Vec<String>,
}

impl RandomContent {
    pub fn new(image: &ImageConfig, vision: &VisionConfig) -> Self {
        Self {
            image_url_template: image.image_url_template.clone(),
            labels: vision.labels.clone(),
        }
    }
}

impl ContentProvider for RandomContent {
    fn chat_reply(&self) -> String {
        REPLY_TEMPLATES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(REPLY_TEMPLATES[0])
            .to_string()
    }

    fn image_url(&self, job: &ImageJob) -> String {
        self.image_url_template.replace("{id}", &job.id.to_string())
    }

    fn detect_objects(&self, frame_width: f64, frame_height: f64) -> RecognitionResult {
        let mut rng = rand::thread_rng();
        let count = rng.gen_range(1..=MAX_OBJECTS);
        let objects = (0..count)
            .map(|_| DetectedObject {
                label: self
                    .labels
                    .choose(&mut rng)
                    .cloned()
                    .unwrap_or_else(|| "Object".to_string()),
                score: SCORE_FLOOR + rng.r#gen::<f64>() * (1.0 - SCORE_FLOOR),
                bbox: BoundingBox {
                    x: rng.r#gen::<f64>() * (frame_width - BOX_MARGIN),
                    y: rng.r#gen::<f64>() * (frame_height - BOX_MARGIN),
                    width: BOX_MIN_SIDE + rng.r#gen::<f64>() * BOX_SIDE_SPREAD,
                    height: BOX_MIN_SIDE + rng.r#gen::<f64>() * BOX_SIDE_SPREAD,
                },
            })
            .collect::<Vec<_>>();

        RecognitionResult {
            object_count: objects.len(),
            objects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trident_core::ImageJobStatus;

    fn content() -> RandomContent {
        RandomContent::new(&ImageConfig::default(), &VisionConfig::default())
    }

    #[test]
    fn replies_come_from_templates() {
        let content = content();
        for _ in 0..50 {
            assert!(REPLY_TEMPLATES.contains(&content.chat_reply().as_str()));
        }
    }

    #[test]
    fn image_url_embeds_job_id() {
        let job = ImageJob {
            id: 42,
            token: "tk".into(),
            prompt: "p".into(),
            status: ImageJobStatus::Processing,
            progress: 90,
            image_url: None,
            created_at: String::new(),
        };
        assert_eq!(
            content().image_url(&job),
            "https://picsum.photos/seed/42/1024/1024"
        );
    }

    #[test]
    fn detections_stay_within_bounds() {
        let content = content();
        let labels = VisionConfig::default().labels;
        for _ in 0..200 {
            let result = content.detect_objects(800.0, 600.0);
            assert!((1..=5).contains(&result.object_count));
            assert_eq!(result.object_count, result.objects.len());
            for object in &result.objects {
                assert!(labels.contains(&object.label));
                assert!(object.score >= 0.8 && object.score < 1.0);
                assert!(object.bbox.x >= 0.0 && object.bbox.x < 700.0);
                assert!(object.bbox.y >= 0.0 && object.bbox.y < 500.0);
                assert!(object.bbox.width >= 50.0 && object.bbox.width < 150.0);
                assert!(object.bbox.height >= 50.0 && object.bbox.height < 150.0);
            }
        }
    }
}
